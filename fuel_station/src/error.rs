use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    /// Rejected configuration; raised before any event is scheduled.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A statistic was asked of a run that acquired no pump at all.
    #[error("no vehicle was served, statistics are undefined")]
    EmptySample,

    #[error(transparent)]
    Engine(#[from] des::Error),

    #[error("could not parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StationError>;
