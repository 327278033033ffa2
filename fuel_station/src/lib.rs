//! Fuel station queueing model on top of the `des` engine.
//!
//! Vehicles arrive with exponential interarrival times, take one of a fixed
//! number of pumps (or queue first-come first-served when all are busy),
//! fill up for an exponential service time and leave. A run produces an
//! immutable [`Statistics`] snapshot of waits and service durations.

// ============================================================================
// Modules
// ============================================================================

pub mod arrivals;
pub mod config;
pub mod error;
pub mod random;
pub mod report;
pub mod simulation;
pub mod station;
pub mod statistics;
pub mod trace;

pub use arrivals::ArrivalDriver;
pub use config::StationConfig;
pub use error::{Result, StationError};
pub use random::{RandomProcessSource, Stream};
pub use report::RunReport;
pub use simulation::{RunOutcome, build, run};
pub use station::{Station, Vehicle, VehicleState};
pub use statistics::{Statistics, StatisticsCollector};
pub use trace::{Dispatch, DispatchTrace};

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A vehicle pulls into the station.
    Arrival { vehicle_id: usize },
    /// A pump was granted to the vehicle after waiting `wait_time`.
    ResourceAcquired { vehicle_id: usize, wait_time: f64 },
    /// The vehicle finished filling up and frees its pump.
    ServiceComplete { vehicle_id: usize },
}

impl Event {
    pub fn vehicle_id(&self) -> usize {
        match self {
            Event::Arrival { vehicle_id }
            | Event::ResourceAcquired { vehicle_id, .. }
            | Event::ServiceComplete { vehicle_id } => *vehicle_id,
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Stats {
    ArrivalStats(ArrivalStats),
    StationStats(StationStats),
    TraceStats(Vec<Dispatch>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalStats {
    pub arrivals: usize,
    pub next_vehicle_id: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationStats {
    pub capacity: usize,
    pub in_use: usize,
    pub peak_in_use: usize,
    pub queue_length: usize,
    /// Vehicles holding a pump when the stats were taken.
    pub in_service: usize,
    pub statistics: Statistics,
}

impl StationStats {
    pub fn is_at_capacity(&self) -> bool {
        self.in_use == self.capacity
    }

    pub fn has_queue(&self) -> bool {
        self.queue_length > 0
    }
}
