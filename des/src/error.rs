//! Engine error type.

use thiserror::Error;

/// Fatal errors raised by the event engine and its resource pool.
///
/// Both variants mean the run is in an inconsistent state: the loop stops at
/// the first one and hands it back to the caller instead of continuing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("cannot schedule an event at t={time} before the current time t={now}")]
    InvalidTime { time: f64, now: f64 },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
