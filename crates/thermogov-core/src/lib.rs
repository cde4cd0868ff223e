//! # thermogov-core
//!
//! **A zone-based thermal governor.**
//!
//! `thermogov-core` samples a CPU temperature, smooths it with a moving
//! average, classifies the reading into overlapping thermal zones, and turns
//! cooling devices on or off according to the zones it falls in.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//!
//! use thermogov_core::{Governor, GovernorConfig};
//!
//! let config = GovernorConfig::default();
//! let mut governor = Governor::new(
//!     &config,
//!     config.sensor.build(),
//!     config.actuator.build(),
//! )?;
//!
//! // Run until the flag is cleared (e.g. from a Ctrl+C handler).
//! let running = AtomicBool::new(true);
//! governor.run(&running, None)?;
//! # Ok::<(), thermogov_core::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Sensor → MovingAverage → bias → ZoneClassifier → Actuator
//!
//! - **Bias**: a sample above its own moving average is treated as `margin`
//!   degrees hotter, so cooling engages early on a rising edge.
//! - **Zones**: inclusive intervals that may share boundaries. Every matching
//!   zone commands every registered device, in configuration order, so the
//!   last matching zone decides each device's final state. A temperature
//!   outside every zone commands nothing.
//!
//! Sensors implement [`TemperatureSensor`]; actuators implement
//! [`CoolingActuator`]. The [`Governor`] owns one of each plus the only
//! mutable state in the loop, the [`MovingAverage`].

pub mod actuator;
pub mod actuators;
pub mod average;
pub mod classifier;
pub mod config;
pub mod error;
pub mod governor;
pub mod sensor;
pub mod sensors;
pub mod zone;

pub use actuator::CoolingActuator;
pub use actuators::{DryRunActuator, SysfsCoolingActuator};
pub use average::{Fill, MovingAverage};
pub use classifier::{Classification, Command, CoolingState, ZoneClassifier};
pub use config::{ActuatorConfig, GovernorConfig, SensorConfig};
pub use error::{ActuationError, Error, Result, SensorError};
pub use governor::{Governor, IterationReport, RunSummary};
pub use sensor::{SensorInfo, SensorKind, TemperatureSensor};
pub use sensors::{
    AcpiSensor, ReplaySensor, SysfsZoneSensor, all_sensors, detect_available_sensors,
};
pub use zone::{DeviceId, ThermalZone, ThermalZoneTable};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
