use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Exp};

use crate::config::StationConfig;
use crate::error::{Result, StationError};

/// Independent random streams of one run.
///
/// Arrivals and service times draw from separately seeded generators, so the
/// arrival pattern of a seed does not change when only the number of pumps or
/// the service time differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Arrivals,
    Service,
}

impl Stream {
    fn seed(self, base: u64) -> u64 {
        match self {
            Stream::Arrivals => base,
            Stream::Service => base ^ 0x9E37_79B9_7F4A_7C15,
        }
    }
}

/// Exponential interarrival and service durations from a seedable generator.
pub struct RandomProcessSource {
    rng: StdRng,
    interarrival: Exp<f64>,
    service: Exp<f64>,
}

fn exponential(name: &str, mean: f64) -> Result<Exp<f64>> {
    if !(mean.is_finite() && mean > 0.0) {
        return Err(StationError::InvalidParameter(format!(
            "{name} must be a positive number, got {mean}"
        )));
    }
    Exp::new(1.0 / mean)
        .map_err(|e| StationError::InvalidParameter(format!("{name}: {e}")))
}

// Durations are strictly positive; an exact 0.0 is redrawn.
fn draw(dist: &Exp<f64>, rng: &mut StdRng) -> f64 {
    loop {
        let x = dist.sample(rng);
        if x > 0.0 {
            return x;
        }
    }
}

impl RandomProcessSource {
    pub fn new(mean_interarrival: f64, mean_service: f64, seed: Option<u64>) -> Result<Self> {
        let interarrival = exponential("mean_interarrival_time", mean_interarrival)?;
        let service = exponential("mean_service_time", mean_service)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            rng,
            interarrival,
            service,
        })
    }

    /// Source for one `stream` of the run described by `config`.
    pub fn for_stream(config: &StationConfig, stream: Stream) -> Result<Self> {
        Self::new(
            config.mean_interarrival_time,
            config.mean_service_time,
            config.random_seed.map(|seed| stream.seed(seed)),
        )
    }

    pub fn sample_interarrival(&mut self) -> f64 {
        draw(&self.interarrival, &mut self.rng)
    }

    pub fn sample_service(&mut self) -> f64 {
        draw(&self.service, &mut self.rng)
    }
}
