use std::fmt;

use crate::simulation::RunOutcome;

/// Utilization (in percent) above which more pumps are recommended.
pub const RECOMMENDATION_THRESHOLD: f64 = 80.0;

/// Derived figures of a run, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub arrivals: usize,
    pub served_count: usize,
    pub acquired_count: usize,
    /// `None` when no vehicle got a pump before the horizon.
    pub mean_wait_time: Option<f64>,
    pub max_wait_time: Option<f64>,
    pub utilization_percentage: f64,
    pub recommend_more_capacity: bool,
}

impl RunReport {
    pub fn new(outcome: &RunOutcome) -> Self {
        let utilization_percentage = outcome.utilization_percentage();
        Self {
            arrivals: outcome.arrivals,
            served_count: outcome.served_count(),
            acquired_count: outcome.statistics.acquired_count(),
            mean_wait_time: outcome.statistics.mean_wait_time().ok(),
            max_wait_time: outcome.statistics.max_wait_time().ok(),
            utilization_percentage,
            recommend_more_capacity: utilization_percentage > RECOMMENDATION_THRESHOLD,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation results:")?;
        match self.mean_wait_time {
            Some(mean) => writeln!(f, "  Mean wait time:      {:.2}", mean)?,
            None => writeln!(f, "  Mean wait time:      n/a (no vehicle served)")?,
        }
        if let Some(max) = self.max_wait_time {
            writeln!(f, "  Max wait time:       {:.2}", max)?;
        }
        writeln!(f, "  Vehicles arrived:    {}", self.arrivals)?;
        writeln!(f, "  Vehicles served:     {}", self.served_count)?;
        writeln!(f, "  Pump utilization:    {:.2}%", self.utilization_percentage)?;
        if self.recommend_more_capacity {
            write!(f, "Consider adding pumps to the station.")
        } else {
            write!(f, "Station capacity is adequate.")
        }
    }
}
