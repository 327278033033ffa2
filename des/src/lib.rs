//! A small discrete-event engine.
//!
//! Agents react to events broadcast by an [`EventLoop`] and answer with a
//! [`Response`]: new events to schedule and, optionally, new agents to add.
//! Simulated time is an `f64`; events at the same instant fire in the order
//! they were scheduled.

use log::trace;

pub mod error;
pub mod parallel;
pub mod resource;
pub mod scheduler;

pub use error::{Error, Result};
pub use resource::{Grant, Outcome, PendingRequest, ResourcePool};
pub use scheduler::{Event, EventHandle, EventScheduler};

pub struct Response<T, S> {
    pub events: Vec<(f64, T)>,
    pub agents: Vec<Box<dyn Agent<T, S>>>,
}

impl<T, S> Default for Response<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> Response<T, S> {
    pub fn new() -> Response<T, S> {
        Response {
            events: Vec::new(),
            agents: Vec::new(),
        }
    }

    pub fn event(t: f64, data: T) -> Response<T, S> {
        Response {
            events: vec![(t, data)],
            agents: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.agents.is_empty()
    }
}

pub trait Agent<T, S> {
    /// Reacts to an event dispatched at `current_t`. An error aborts the run.
    fn act(&mut self, _current_t: f64, _data: &T) -> Result<Response<T, S>> {
        Ok(Response::new())
    }

    fn stats(&self) -> S;
}

pub struct EventLoop<T, S> {
    scheduler: EventScheduler<T>,
    agents: Vec<Box<dyn Agent<T, S>>>,
}

impl<T, S> EventLoop<T, S> {
    pub fn new(
        events: Vec<(f64, T)>,
        agents: Vec<Box<dyn Agent<T, S>>>,
    ) -> Result<EventLoop<T, S>> {
        let mut scheduler = EventScheduler::new();
        for (t, data) in events {
            scheduler.schedule(t, data)?;
        }
        Ok(EventLoop { scheduler, agents })
    }

    pub fn current_t(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn scheduler(&self) -> &EventScheduler<T> {
        &self.scheduler
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Schedules an event from outside the agents, e.g. to seed a run.
    pub fn schedule(&mut self, t: f64, data: T) -> Result<EventHandle> {
        self.scheduler.schedule(t, data)
    }

    fn broadcast(&mut self, event: Event<T>) -> Result<()> {
        trace!("[{:.3}] dispatching event #{}", event.time, event.sequence);
        let mut new_agents = Vec::<Box<dyn Agent<T, S>>>::new();
        for agent in &mut self.agents {
            let response = agent.act(event.time, &event.data)?;
            for (t, data) in response.events {
                self.scheduler.schedule(t, data)?;
            }
            new_agents.extend(response.agents);
        }
        self.agents.extend(new_agents);
        Ok(())
    }

    /// Dispatches events in `(time, sequence)` order until the next one lies
    /// beyond `until` or the queue runs dry. Returns the number dispatched.
    ///
    /// Events past `until` are never dispatched. The first agent error stops
    /// the loop and is returned as is.
    pub fn run_until(&mut self, until: f64) -> Result<usize> {
        let mut dispatched = 0;
        while let Some(event) = self.scheduler.pop_until(until) {
            self.broadcast(event)?;
            dispatched += 1;
        }
        Ok(dispatched)
    }

    pub fn stats(&self) -> Vec<S> {
        self.agents.iter().map(|agent| agent.stats()).collect()
    }
}
