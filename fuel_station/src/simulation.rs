use des::{Agent, EventLoop};
use log::{info, warn};

use crate::arrivals::ArrivalDriver;
use crate::config::StationConfig;
use crate::error::{Result, StationError};
use crate::random::{RandomProcessSource, Stream};
use crate::report::{RECOMMENDATION_THRESHOLD, RunReport};
use crate::station::Station;
use crate::statistics::Statistics;
use crate::trace::{Dispatch, DispatchTrace};
use crate::{Event, Stats};

/// Everything a finished run leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub config: StationConfig,
    pub statistics: Statistics,
    pub arrivals: usize,
    pub peak_in_use: usize,
    /// Vehicles holding a pump when the horizon was reached.
    pub in_service_at_horizon: usize,
    pub queued_at_horizon: usize,
    pub trace: Option<Vec<Dispatch>>,
}

impl RunOutcome {
    /// Assembles the outcome from the per-agent stats of a finished loop.
    pub fn from_stats(config: StationConfig, stats: Vec<Stats>) -> Result<Self> {
        let mut arrivals = 0;
        let mut station = None;
        let mut trace = None;
        for s in stats {
            match s {
                Stats::ArrivalStats(a) => arrivals = a.arrivals,
                Stats::StationStats(st) => station = Some(st),
                Stats::TraceStats(t) => trace = Some(t),
            }
        }
        let station = station.ok_or_else(|| {
            StationError::Engine(des::Error::InvariantViolation(
                "run finished without a station".to_string(),
            ))
        })?;
        Ok(Self {
            config,
            statistics: station.statistics,
            arrivals,
            peak_in_use: station.peak_in_use,
            in_service_at_horizon: station.in_service,
            queued_at_horizon: station.queue_length,
            trace,
        })
    }

    pub fn served_count(&self) -> usize {
        self.statistics.served_count()
    }

    pub fn mean_wait_time(&self) -> Result<f64> {
        self.statistics.mean_wait_time()
    }

    pub fn utilization_percentage(&self) -> f64 {
        self.statistics
            .utilization_percentage(self.config.server_capacity, self.config.simulation_horizon)
    }

    /// Utilization by the reference formula, see [`Statistics::raw_utilization`].
    pub fn raw_utilization_percentage(&self) -> f64 {
        self.statistics
            .raw_utilization(self.config.server_capacity, self.config.simulation_horizon)
            * 100.0
    }

    pub fn report(&self) -> RunReport {
        RunReport::new(self)
    }
}

/// Builds the event loop for one run: the arrival driver, the station and,
/// if asked for, a dispatch trace. The first arrival is already scheduled.
pub fn build(config: &StationConfig) -> Result<EventLoop<Event, Stats>> {
    config.validate()?;

    let mut driver = ArrivalDriver::new(RandomProcessSource::for_stream(config, Stream::Arrivals)?);
    let station = Station::new(
        config.server_capacity,
        RandomProcessSource::for_stream(config, Stream::Service)?,
    )?;
    let first_arrival = driver.first_arrival();

    // the driver goes first so that the next arrival is always scheduled
    // ahead of anything the station does with the current one
    let mut agents: Vec<Box<dyn Agent<Event, Stats>>> = vec![Box::new(driver), Box::new(station)];
    if config.record_trace {
        agents.push(Box::new(DispatchTrace::new()));
    }

    Ok(EventLoop::new(vec![first_arrival], agents)?)
}

/// Validates `config`, runs the station up to its horizon and returns the
/// outcome. Any engine error aborts the run; no partial outcome is returned.
pub fn run(config: &StationConfig) -> Result<RunOutcome> {
    info!(
        "running {} pump(s) for {} time units (mean interarrival {}, mean service {}, seed {:?})",
        config.server_capacity,
        config.simulation_horizon,
        config.mean_interarrival_time,
        config.mean_service_time,
        config.random_seed
    );

    let mut event_loop = build(config)?;
    let dispatched = event_loop.run_until(config.simulation_horizon)?;
    let outcome = RunOutcome::from_stats(config.clone(), event_loop.stats())?;

    let utilization = outcome.utilization_percentage();
    info!(
        "dispatched {} events: {} arrivals, {} served, utilization {:.2}%",
        dispatched,
        outcome.arrivals,
        outcome.served_count(),
        utilization
    );
    if utilization > RECOMMENDATION_THRESHOLD {
        warn!(
            "pump utilization {:.2}% is above {}%, consider adding capacity",
            utilization, RECOMMENDATION_THRESHOLD
        );
    }
    Ok(outcome)
}
