use crate::random::RandomProcessSource;
use crate::{ArrivalStats, Event, Stats};
use des::{Agent, Response};
use log::debug;

/// Feeds the station an endless stream of vehicles.
///
/// Only one arrival is ever pending: each `Arrival` schedules the next one,
/// so the stream runs for as long as the horizon allows.
pub struct ArrivalDriver {
    source: RandomProcessSource,
    next_vehicle_id: usize,
    arrivals: usize,
}

impl ArrivalDriver {
    pub fn new(source: RandomProcessSource) -> Self {
        Self {
            source,
            next_vehicle_id: 1,
            arrivals: 0,
        }
    }

    /// The arrival that starts the run, one interarrival time after t=0.
    pub fn first_arrival(&mut self) -> (f64, Event) {
        self.next_arrival(0.0)
    }

    fn next_arrival(&mut self, current_t: f64) -> (f64, Event) {
        let vehicle_id = self.next_vehicle_id;
        self.next_vehicle_id += 1;
        (
            current_t + self.source.sample_interarrival(),
            Event::Arrival { vehicle_id },
        )
    }
}

impl Agent<Event, Stats> for ArrivalDriver {
    fn act(&mut self, current_t: f64, data: &Event) -> des::Result<Response<Event, Stats>> {
        match data {
            Event::Arrival { vehicle_id } => {
                self.arrivals += 1;
                let (t, next) = self.next_arrival(current_t);
                debug!(
                    "[{:.2}] vehicle {} arrived, next vehicle due at {:.2}",
                    current_t, vehicle_id, t
                );
                Ok(Response::event(t, next))
            }
            _ => Ok(Response::new()),
        }
    }

    fn stats(&self) -> Stats {
        Stats::ArrivalStats(ArrivalStats {
            arrivals: self.arrivals,
            next_vehicle_id: self.next_vehicle_id,
        })
    }
}
