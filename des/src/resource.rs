//! A pool of identical, interchangeable units handed out first-come
//! first-served.
//!
//! A request that cannot be granted is parked as plain data: the caller hands
//! over whatever it needs to carry on later (`continuation`) and gets it back
//! inside a [`Grant`] when a release frees a unit for it.

use std::collections::{HashSet, VecDeque};

use crate::error::{Error, Result};

/// Result of [`ResourcePool::request`].
#[derive(Debug, PartialEq)]
pub enum Outcome<C> {
    /// A unit was free; the continuation is handed straight back.
    Granted(C),
    /// All units are busy; the request waits in the queue.
    Queued,
}

#[derive(Debug)]
pub struct PendingRequest<C> {
    pub owner: usize,
    pub enqueue_time: f64,
    pub continuation: C,
}

/// A queued request resumed by a release.
#[derive(Debug, PartialEq)]
pub struct Grant<C> {
    pub owner: usize,
    pub enqueue_time: f64,
    pub granted_at: f64,
    pub continuation: C,
}

impl<C> Grant<C> {
    pub fn wait_time(&self) -> f64 {
        self.granted_at - self.enqueue_time
    }
}

pub struct ResourcePool<C> {
    capacity: usize,
    in_use: usize,
    peak_in_use: usize,
    holders: HashSet<usize>,
    wait_queue: VecDeque<PendingRequest<C>>,
    clock: f64,
}

impl<C> ResourcePool<C> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvariantViolation(
                "resource pool capacity must be positive".to_string(),
            ));
        }
        Ok(ResourcePool {
            capacity,
            in_use: 0,
            peak_in_use: 0,
            holders: HashSet::new(),
            wait_queue: VecDeque::new(),
            clock: 0.0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Highest `in_use` observed so far.
    pub fn peak_in_use(&self) -> usize {
        self.peak_in_use
    }

    pub fn available(&self) -> usize {
        self.capacity - self.in_use
    }

    pub fn is_at_capacity(&self) -> bool {
        self.in_use == self.capacity
    }

    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    pub fn holds(&self, owner: usize) -> bool {
        self.holders.contains(&owner)
    }

    /// Asks for one unit on behalf of `owner` at time `at`.
    pub fn request(&mut self, owner: usize, at: f64, continuation: C) -> Result<Outcome<C>> {
        self.advance_clock(at)?;
        if self.holders.contains(&owner) || self.wait_queue.iter().any(|r| r.owner == owner) {
            return Err(Error::InvariantViolation(format!(
                "owner {owner} already holds or awaits a unit"
            )));
        }

        if self.in_use < self.capacity {
            self.acquire(owner)?;
            return Ok(Outcome::Granted(continuation));
        }

        self.wait_queue.push_back(PendingRequest {
            owner,
            enqueue_time: at,
            continuation,
        });
        Ok(Outcome::Queued)
    }

    /// Returns the unit held by `owner`. If anyone is waiting, the unit goes
    /// straight to the head of the queue and that request is handed back.
    pub fn release(&mut self, owner: usize, at: f64) -> Result<Option<Grant<C>>> {
        self.advance_clock(at)?;
        if !self.holders.remove(&owner) {
            return Err(Error::InvariantViolation(format!(
                "owner {owner} released a unit it does not hold"
            )));
        }
        self.in_use -= 1;

        // requests never go back in time, so push order is (enqueue_time, request order)
        let Some(next) = self.wait_queue.pop_front() else {
            return Ok(None);
        };
        self.acquire(next.owner)?;
        Ok(Some(Grant {
            owner: next.owner,
            enqueue_time: next.enqueue_time,
            granted_at: at,
            continuation: next.continuation,
        }))
    }

    fn acquire(&mut self, owner: usize) -> Result<()> {
        if self.in_use >= self.capacity {
            return Err(Error::InvariantViolation(format!(
                "granting owner {owner} would exceed capacity {}",
                self.capacity
            )));
        }
        self.in_use += 1;
        self.peak_in_use = self.peak_in_use.max(self.in_use);
        self.holders.insert(owner);
        Ok(())
    }

    fn advance_clock(&mut self, at: f64) -> Result<()> {
        if at.is_nan() || at < self.clock {
            return Err(Error::InvalidTime {
                time: at,
                now: self.clock,
            });
        }
        self.clock = at;
        Ok(())
    }
}
