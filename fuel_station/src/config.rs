use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StationError};

/// Parameters of one station run. Times share whatever unit the caller
/// picks (minutes in the defaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationConfig {
    pub mean_interarrival_time: f64,
    pub mean_service_time: f64,
    pub simulation_horizon: f64,
    pub server_capacity: usize,
    /// Without a seed the run draws from OS entropy and is not reproducible.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Keep every dispatched event in the run outcome.
    #[serde(default)]
    pub record_trace: bool,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            mean_interarrival_time: 5.0,
            mean_service_time: 7.0,
            simulation_horizon: 600.0,
            server_capacity: 2,
            random_seed: None,
            record_trace: false,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StationError::InvalidParameter(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

impl StationConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            random_seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: StationConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        positive("mean_interarrival_time", self.mean_interarrival_time)?;
        positive("mean_service_time", self.mean_service_time)?;
        positive("simulation_horizon", self.simulation_horizon)?;
        if self.server_capacity == 0 {
            return Err(StationError::InvalidParameter(
                "server_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Offered load per pump, `mean_service / (capacity * mean_interarrival)`.
    pub fn offered_load(&self) -> f64 {
        self.mean_service_time / (self.server_capacity as f64 * self.mean_interarrival_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_matches_reference_station() {
        let config = StationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_capacity, 2);
        assert_relative_eq!(config.offered_load(), 0.7);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = StationConfig {
            server_capacity: 0,
            ..StationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn non_positive_times_are_rejected() {
        for (ia, svc, horizon) in [
            (0.0, 7.0, 600.0),
            (5.0, -1.0, 600.0),
            (5.0, 7.0, 0.0),
            (f64::NAN, 7.0, 600.0),
            (5.0, 7.0, f64::INFINITY),
        ] {
            let config = StationConfig {
                mean_interarrival_time: ia,
                mean_service_time: svc,
                simulation_horizon: horizon,
                ..StationConfig::default()
            };
            assert!(config.validate().is_err(), "{ia} {svc} {horizon}");
        }
    }

    #[test]
    fn parses_toml() {
        let config = StationConfig::from_toml_str(
            r#"
            mean_interarrival_time = 10.0
            mean_service_time = 2.0
            simulation_horizon = 1000.0
            server_capacity = 1
            random_seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.server_capacity, 1);
        assert_eq!(config.random_seed, Some(7));
        assert!(!config.record_trace);
    }

    #[test]
    fn missing_fields_fail_to_parse() {
        let err = StationConfig::from_toml_str("mean_service_time = 2.0").unwrap_err();
        assert!(matches!(err, StationError::Config(_)));
    }

    #[test]
    fn parsed_values_are_validated() {
        let err = StationConfig::from_toml_str(
            r#"
            mean_interarrival_time = 10.0
            mean_service_time = 2.0
            simulation_horizon = 1000.0
            server_capacity = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, StationError::InvalidParameter(_)));
    }
}
