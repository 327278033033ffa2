use crate::{Event, Stats};
use des::{Agent, Response};

#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub time: f64,
    pub event: Event,
}

/// Passive agent that records every dispatched event in order.
#[derive(Default)]
pub struct DispatchTrace {
    dispatches: Vec<Dispatch>,
}

impl DispatchTrace {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Agent<Event, Stats> for DispatchTrace {
    fn act(&mut self, current_t: f64, data: &Event) -> des::Result<Response<Event, Stats>> {
        self.dispatches.push(Dispatch {
            time: current_t,
            event: data.clone(),
        });
        Ok(Response::new())
    }

    fn stats(&self) -> Stats {
        Stats::TraceStats(self.dispatches.clone())
    }
}
