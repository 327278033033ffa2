use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};

/// A pending event: `data` fires at simulated `time`.
///
/// `sequence` is the insertion counter of the owning scheduler and only breaks
/// ties between events at exactly the same time (lower fires first).
#[derive(Debug)]
pub struct Event<T> {
    pub time: f64,
    pub sequence: u64,
    pub data: T,
}

impl<T> PartialEq for Event<T> {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl<T> Eq for Event<T> {}

// Inverted so that `BinaryHeap` (a max-heap) yields the earliest event.
impl<T> Ord for Event<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<T> PartialOrd for Event<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Identifies a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventHandle {
    time: f64,
    sequence: u64,
}

impl EventHandle {
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Time-ordered queue of pending events that owns the simulation clock.
pub struct EventScheduler<T> {
    queue: BinaryHeap<Event<T>>,
    now: f64,
    next_sequence: u64,
}

impl<T> Default for EventScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventScheduler<T> {
    pub fn new() -> Self {
        EventScheduler {
            queue: BinaryHeap::new(),
            now: 0.0,
            next_sequence: 0,
        }
    }

    /// Current simulated time. Never decreases.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Queues `data` to fire at `time`.
    ///
    /// Fails with [`Error::InvalidTime`] when `time` lies before the clock or
    /// is not a number; such an event could never be dispatched consistently.
    pub fn schedule(&mut self, time: f64, data: T) -> Result<EventHandle> {
        if time.is_nan() || time < self.now {
            return Err(Error::InvalidTime {
                time,
                now: self.now,
            });
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Event {
            time,
            sequence,
            data,
        });
        Ok(EventHandle { time, sequence })
    }

    /// Removes the earliest event and advances the clock to its time.
    pub fn pop_next(&mut self) -> Option<Event<T>> {
        let event = self.queue.pop()?;
        self.now = event.time;
        Some(event)
    }

    /// Like [`pop_next`](Self::pop_next), but leaves the queue untouched when
    /// the earliest event lies beyond `horizon`.
    pub fn pop_until(&mut self, horizon: f64) -> Option<Event<T>> {
        match self.peek_time() {
            Some(t) if t <= horizon => self.pop_next(),
            _ => None,
        }
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.queue.peek().map(|e| e.time)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total number of events ever scheduled.
    pub fn scheduled_count(&self) -> u64 {
        self.next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_queue() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(2.0, 'b').unwrap();
        scheduler.schedule(1.0, 'a').unwrap();
        scheduler.schedule(3.5, 'c').unwrap();

        let order: Vec<char> = std::iter::from_fn(|| scheduler.pop_next())
            .map(|e| e.data)
            .collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
        assert_eq!(scheduler.now(), 3.5);
    }

    #[test]
    fn ties_fire_in_insertion_order() {
        let mut scheduler = EventScheduler::new();
        for label in ["first", "second", "third"] {
            scheduler.schedule(4.0, label).unwrap();
        }
        scheduler.schedule(1.0, "early").unwrap();

        let order: Vec<&str> = std::iter::from_fn(|| scheduler.pop_next())
            .map(|e| e.data)
            .collect();
        assert_eq!(order, vec!["early", "first", "second", "third"]);
    }

    #[test]
    fn rejects_events_in_the_past() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(5.0, ()).unwrap();
        scheduler.pop_next();

        let err = scheduler.schedule(4.999, ()).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidTime {
                time: 4.999,
                now: 5.0
            }
        );
        // scheduling at "now" is fine
        assert!(scheduler.schedule(5.0, ()).is_ok());
    }

    #[test]
    fn rejects_nan_time() {
        let mut scheduler = EventScheduler::new();
        assert!(scheduler.schedule(f64::NAN, ()).is_err());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn pop_until_keeps_events_beyond_horizon() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(1.0, 1).unwrap();
        scheduler.schedule(10.0, 2).unwrap();

        assert_eq!(scheduler.pop_until(5.0).map(|e| e.data), Some(1));
        assert!(scheduler.pop_until(5.0).is_none());
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.now(), 1.0);
    }

    #[test]
    fn handles_count_up() {
        let mut scheduler = EventScheduler::new();
        let a = scheduler.schedule(1.0, ()).unwrap();
        let b = scheduler.schedule(1.0, ()).unwrap();
        assert!(a.sequence() < b.sequence());
        assert_eq!(b.time(), 1.0);
        assert_eq!(scheduler.scheduled_count(), 2);
    }
}
