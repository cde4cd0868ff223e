//! Abstract temperature sensor trait.
//!
//! Every sensor implements [`TemperatureSensor`], which provides metadata via
//! [`SensorInfo`], availability checking, and a single blocking read.

use crate::error::SensorError;

/// Where a sensor gets its reading from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Parses the text output of an external diagnostic command.
    Command,
    /// Reads a kernel-exported file.
    Sysfs,
    /// In-process value, used for simulation and tests.
    Synthetic,
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Sysfs => write!(f, "sysfs"),
            Self::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Metadata about a temperature sensor.
#[derive(Debug, Clone)]
pub struct SensorInfo {
    /// Unique identifier (e.g. `"acpi"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    pub kind: SensorKind,
}

/// Trait that every temperature sensor must implement.
pub trait TemperatureSensor: Send {
    /// Sensor metadata.
    fn info(&self) -> &SensorInfo;

    /// Check if this sensor can operate on the current machine.
    fn is_available(&self) -> bool;

    /// Take one reading in degrees Celsius.
    ///
    /// Implementations acquire whatever handle they need (subprocess, file)
    /// inside this call and release it before returning, on every path.
    fn read(&mut self) -> Result<f64, SensorError>;

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }
}

impl<S: TemperatureSensor + ?Sized> TemperatureSensor for Box<S> {
    fn info(&self) -> &SensorInfo {
        (**self).info()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn read(&mut self) -> Result<f64, SensorError> {
        (**self).read()
    }
}

/// Reject readings the governor cannot reason about.
pub(crate) fn ensure_finite(value: f64) -> Result<f64, SensorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SensorError::NonFinite(value))
    }
}
