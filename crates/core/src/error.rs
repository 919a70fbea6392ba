use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum PowertrackError {
    #[error("config error: {0}")]
    Config(String),

    /// A raw battery reading could not be obtained this cycle.
    #[error("sensor '{sensor}' unavailable at '{}': {source}", .path.display())]
    SensorUnavailable {
        sensor: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sensor produced something that is not a number.
    #[error("sensor '{sensor}' returned unparsable value {value:?}")]
    SensorParse { sensor: &'static str, value: String },

    #[error("no battery found: {0}")]
    NoBattery(String),
}

pub type Result<T, E = PowertrackError> = std::result::Result<T, E>;
