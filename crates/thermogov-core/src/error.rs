//! Error types for the governor.
//!
//! Sensor failures are propagated to the loop driver, actuation failures are
//! recovered per device by the loop. See [`crate::governor`].

use std::path::PathBuf;
use std::time::Duration;

use crate::zone::DeviceId;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A moving average was constructed with room for zero samples.
    #[error("moving average capacity must be at least 1")]
    ZeroCapacity,

    /// The mean was requested before any sample was recorded.
    #[error("mean requested before any sample was recorded")]
    EmptyAverage,

    /// The temperature sensor did not produce a usable reading.
    #[error("sensor read failed: {0}")]
    SensorReadFailure(#[from] SensorError),

    /// A single cooling device could not be driven.
    #[error(transparent)]
    ActuationFailure(#[from] ActuationError),

    /// The configuration is structurally invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a sensor read can fail.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("could not launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` did not finish within {}ms", .timeout.as_millis())]
    Timeout { program: String, timeout: Duration },

    #[error("could not read output of `{program}`: {source}")]
    Output {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}")]
    CommandFailed { program: String, status: String },

    #[error("no line matching {label:?} in sensor output")]
    LabelNotFound { label: String },

    #[error("could not parse a temperature from {raw:?}")]
    Parse { raw: String },

    #[error("replay sensor exhausted after {reads} readings")]
    Exhausted { reads: usize },

    #[error("sensor reported a non-finite temperature ({0})")]
    NonFinite(f64),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failed attempt to drive one cooling device.
#[derive(Debug, thiserror::Error)]
#[error("could not set cooling device {device} via {path}: {source}")]
pub struct ActuationError {
    pub device: DeviceId,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
