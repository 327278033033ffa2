use crate::error::{Result, StationError};

/// Per-vehicle waits and per-acquisition service durations of one run.
///
/// Only [`StatisticsCollector`] appends to it; everyone else gets read-only
/// slices and derived figures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    wait_times: Vec<f64>,
    service_durations: Vec<f64>,
    service_starts: Vec<f64>,
    acquisition_order: Vec<usize>,
    departures: usize,
}

impl Statistics {
    /// One entry per vehicle that got a pump, in acquisition order.
    pub fn wait_times(&self) -> &[f64] {
        &self.wait_times
    }

    /// One entry per acquisition, sampled when service starts.
    pub fn service_durations(&self) -> &[f64] {
        &self.service_durations
    }

    pub fn service_starts(&self) -> &[f64] {
        &self.service_starts
    }

    /// Vehicle ids in the order they were granted a pump.
    pub fn acquisition_order(&self) -> &[usize] {
        &self.acquisition_order
    }

    /// Vehicles that finished service and left.
    pub fn served_count(&self) -> usize {
        self.departures
    }

    pub fn acquired_count(&self) -> usize {
        self.wait_times.len()
    }

    /// Mean over every recorded wait, including vehicles still at a pump.
    /// Fails with [`StationError::EmptySample`] until some vehicle has left.
    pub fn mean_wait_time(&self) -> Result<f64> {
        self.check_not_empty()?;
        Ok(self.wait_times.iter().sum::<f64>() / self.wait_times.len() as f64)
    }

    pub fn max_wait_time(&self) -> Result<f64> {
        self.check_not_empty()?;
        self.wait_times
            .iter()
            .copied()
            .reduce(f64::max)
            .ok_or(StationError::EmptySample)
    }

    fn check_not_empty(&self) -> Result<()> {
        if self.departures == 0 {
            return Err(StationError::EmptySample);
        }
        Ok(())
    }

    /// Pump time spent serving before `horizon`. A service still running at
    /// the horizon only counts up to it.
    pub fn busy_time(&self, horizon: f64) -> f64 {
        self.service_starts
            .iter()
            .zip(&self.service_durations)
            .map(|(start, duration)| duration.min(horizon - start).max(0.0))
            .sum()
    }

    /// Fraction of the available pump time (`capacity * horizon`) spent
    /// serving. Never above 1.0 unless the accounting is broken.
    pub fn utilization(&self, capacity: usize, horizon: f64) -> f64 {
        self.busy_time(horizon) / (capacity as f64 * horizon)
    }

    pub fn utilization_percentage(&self, capacity: usize, horizon: f64) -> f64 {
        self.utilization(capacity, horizon) * 100.0
    }

    /// Full sampled durations over `capacity * horizon`, services running past
    /// the horizon included. Can exceed 1.0 near saturation.
    pub fn raw_utilization(&self, capacity: usize, horizon: f64) -> f64 {
        self.service_durations.iter().sum::<f64>() / (capacity as f64 * horizon)
    }
}

/// The single writer of a run's [`Statistics`].
#[derive(Debug, Default)]
pub struct StatisticsCollector {
    stats: Statistics,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_acquisition(&mut self, vehicle_id: usize, wait_time: f64) {
        self.stats.acquisition_order.push(vehicle_id);
        self.stats.wait_times.push(wait_time);
    }

    pub fn record_service(&mut self, start: f64, duration: f64) {
        self.stats.service_starts.push(start);
        self.stats.service_durations.push(duration);
    }

    pub fn record_departure(&mut self) {
        self.stats.departures += 1;
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn snapshot(&self) -> Statistics {
        self.stats.clone()
    }

    pub fn into_statistics(self) -> Statistics {
        self.stats
    }
}
