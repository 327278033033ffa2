use std::collections::HashMap;

use des::{Agent, Outcome, ResourcePool, Response};
use log::debug;

use crate::error::Result;
use crate::random::RandomProcessSource;
use crate::statistics::{Statistics, StatisticsCollector};
use crate::{Event, StationStats, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState {
    Arrived,
    /// Asked for a pump; either queued or granted and about to start.
    Waiting,
    Serving,
    Departed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: usize,
    pub arrival_time: f64,
    pub service_start_time: Option<f64>,
    pub service_duration: Option<f64>,
    pub state: VehicleState,
}

fn wrong_state(vehicle: &Vehicle, action: &str) -> des::Error {
    des::Error::InvariantViolation(format!(
        "vehicle {} cannot {} while {:?}",
        vehicle.id, action, vehicle.state
    ))
}

impl Vehicle {
    pub fn arrive(id: usize, arrival_time: f64) -> Self {
        Self {
            id,
            arrival_time,
            service_start_time: None,
            service_duration: None,
            state: VehicleState::Arrived,
        }
    }

    fn request_pump(&mut self) -> des::Result<()> {
        if self.state != VehicleState::Arrived {
            return Err(wrong_state(self, "request a pump"));
        }
        self.state = VehicleState::Waiting;
        Ok(())
    }

    fn start_service(&mut self, at: f64, duration: f64) -> des::Result<()> {
        if self.state != VehicleState::Waiting {
            return Err(wrong_state(self, "start service"));
        }
        self.service_start_time = Some(at);
        self.service_duration = Some(duration);
        self.state = VehicleState::Serving;
        Ok(())
    }

    fn depart(&mut self) -> des::Result<()> {
        if self.state != VehicleState::Serving {
            return Err(wrong_state(self, "depart"));
        }
        self.state = VehicleState::Departed;
        Ok(())
    }
}

/// The pumps and everything that happens to a vehicle once it arrives.
///
/// A vehicle that finds every pump busy is parked, as data, in the pool's
/// wait queue. The `ServiceComplete` of whichever vehicle frees a pump pulls
/// it back out and schedules its `ResourceAcquired` at that same instant.
pub struct Station {
    pool: ResourcePool<Vehicle>,
    // vehicles holding a pump, keyed by id
    vehicles: HashMap<usize, Vehicle>,
    source: RandomProcessSource,
    collector: StatisticsCollector,
}

impl Station {
    pub fn new(capacity: usize, source: RandomProcessSource) -> Result<Self> {
        Ok(Self {
            pool: ResourcePool::new(capacity)?,
            vehicles: HashMap::new(),
            source,
            collector: StatisticsCollector::new(),
        })
    }

    pub fn statistics(&self) -> &Statistics {
        self.collector.statistics()
    }

    pub fn in_use(&self) -> usize {
        self.pool.in_use()
    }

    pub fn queue_length(&self) -> usize {
        self.pool.queue_len()
    }

    pub fn vehicle(&self, id: usize) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    fn on_arrival(
        &mut self,
        current_t: f64,
        vehicle_id: usize,
    ) -> des::Result<Response<Event, Stats>> {
        let mut vehicle = Vehicle::arrive(vehicle_id, current_t);
        vehicle.request_pump()?;
        match self.pool.request(vehicle_id, current_t, vehicle)? {
            Outcome::Granted(vehicle) => {
                self.vehicles.insert(vehicle_id, vehicle);
                Ok(Response::event(
                    current_t,
                    Event::ResourceAcquired {
                        vehicle_id,
                        wait_time: 0.0,
                    },
                ))
            }
            Outcome::Queued => {
                debug!(
                    "[{:.2}] vehicle {} queues, {} waiting",
                    current_t,
                    vehicle_id,
                    self.pool.queue_len()
                );
                Ok(Response::new())
            }
        }
    }

    fn on_acquired(
        &mut self,
        current_t: f64,
        vehicle_id: usize,
        wait_time: f64,
    ) -> des::Result<Response<Event, Stats>> {
        let vehicle = self.vehicles.get_mut(&vehicle_id).ok_or_else(|| {
            des::Error::InvariantViolation(format!(
                "vehicle {vehicle_id} acquired a pump it was never granted"
            ))
        })?;
        let duration = self.source.sample_service();
        vehicle.start_service(current_t, duration)?;
        self.collector.record_acquisition(vehicle_id, wait_time);
        self.collector.record_service(current_t, duration);
        debug!(
            "[{:.2}] vehicle {} starts filling up after waiting {:.2}",
            current_t, vehicle_id, wait_time
        );
        Ok(Response::event(
            current_t + duration,
            Event::ServiceComplete { vehicle_id },
        ))
    }

    fn on_service_complete(
        &mut self,
        current_t: f64,
        vehicle_id: usize,
    ) -> des::Result<Response<Event, Stats>> {
        let mut vehicle = self.vehicles.remove(&vehicle_id).ok_or_else(|| {
            des::Error::InvariantViolation(format!(
                "vehicle {vehicle_id} finished service without holding a pump"
            ))
        })?;
        vehicle.depart()?;
        self.collector.record_departure();
        debug!("[{:.2}] vehicle {} leaves", current_t, vehicle_id);

        match self.pool.release(vehicle_id, current_t)? {
            Some(grant) => {
                let wait_time = grant.wait_time();
                let next_id = grant.owner;
                self.vehicles.insert(next_id, grant.continuation);
                Ok(Response::event(
                    current_t,
                    Event::ResourceAcquired {
                        vehicle_id: next_id,
                        wait_time,
                    },
                ))
            }
            None => Ok(Response::new()),
        }
    }
}

impl Agent<Event, Stats> for Station {
    fn act(&mut self, current_t: f64, data: &Event) -> des::Result<Response<Event, Stats>> {
        match data {
            Event::Arrival { vehicle_id } => self.on_arrival(current_t, *vehicle_id),
            Event::ResourceAcquired {
                vehicle_id,
                wait_time,
            } => self.on_acquired(current_t, *vehicle_id, *wait_time),
            Event::ServiceComplete { vehicle_id } => {
                self.on_service_complete(current_t, *vehicle_id)
            }
        }
    }

    fn stats(&self) -> Stats {
        Stats::StationStats(StationStats {
            capacity: self.pool.capacity(),
            in_use: self.pool.in_use(),
            peak_in_use: self.pool.peak_in_use(),
            queue_length: self.pool.queue_len(),
            in_service: self.vehicles.len(),
            statistics: self.collector.snapshot(),
        })
    }
}
