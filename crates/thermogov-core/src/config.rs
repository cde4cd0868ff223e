//! Governor configuration.
//!
//! Loaded once at startup from JSON (or taken from [`GovernorConfig::default`],
//! which carries the reference zone table) and never changed afterwards.
//!
//! ```json
//! {
//!   "poll_interval_ms": 5000,
//!   "average_capacity": 20,
//!   "margin": 5.0,
//!   "devices": [3, 4, 5, 6, 7],
//!   "zones": [
//!     { "lower_bound": 73, "upper_bound": 110, "devices": [3, 6, 7] },
//!     { "lower_bound": 60, "upper_bound": 73, "devices": [3, 4, 6, 7] },
//!     { "lower_bound": 30, "upper_bound": 60, "devices": [3, 4, 5, 6, 7] }
//!   ],
//!   "sensor": { "kind": "acpi", "label": "Thermal 1", "timeout_ms": 2000 },
//!   "actuator": { "kind": "sysfs", "root": "/sys/devices/virtual/thermal" }
//! }
//! ```
//!
//! Every field is optional; missing ones fall back to the defaults above.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actuator::CoolingActuator;
use crate::actuators::{DryRunActuator, SysfsCoolingActuator};
use crate::actuators::sysfs::DEFAULT_COOLING_ROOT;
use crate::average::MovingAverage;
use crate::classifier::ZoneClassifier;
use crate::error::{Error, Result};
use crate::sensor::TemperatureSensor;
use crate::sensors::{AcpiSensor, SysfsZoneSensor, acpi, sysfs::DEFAULT_THERMAL_ROOT};
use crate::zone::{DeviceId, ThermalZone, ThermalZoneTable};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_AVERAGE_CAPACITY: usize = 20;
pub const DEFAULT_MARGIN: f64 = 5.0;

/// Which sensor feeds the governor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorConfig {
    /// `acpi -t`, selecting the line that contains `label`.
    Acpi {
        #[serde(default = "default_acpi_label")]
        label: String,
        #[serde(default = "default_acpi_timeout_ms")]
        timeout_ms: u64,
    },
    /// `<root>/thermal_zone<zone>/temp`.
    Sysfs {
        #[serde(default = "default_thermal_root")]
        root: PathBuf,
        #[serde(default)]
        zone: u32,
    },
}

fn default_acpi_label() -> String {
    acpi::DEFAULT_LABEL.to_string()
}

fn default_acpi_timeout_ms() -> u64 {
    acpi::DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_thermal_root() -> PathBuf {
    PathBuf::from(DEFAULT_THERMAL_ROOT)
}

fn default_cooling_root() -> PathBuf {
    PathBuf::from(DEFAULT_COOLING_ROOT)
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::Acpi {
            label: default_acpi_label(),
            timeout_ms: default_acpi_timeout_ms(),
        }
    }
}

impl SensorConfig {
    pub fn build(&self) -> Box<dyn TemperatureSensor> {
        match self {
            Self::Acpi { label, timeout_ms } => Box::new(AcpiSensor::new(
                label.clone(),
                Duration::from_millis(*timeout_ms),
            )),
            Self::Sysfs { root, zone } => Box::new(SysfsZoneSensor::new(root, *zone)),
        }
    }
}

/// Where cooling commands go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActuatorConfig {
    /// `<root>/cooling_device<id>/cur_state`.
    Sysfs {
        #[serde(default = "default_cooling_root")]
        root: PathBuf,
    },
    /// Log commands only.
    DryRun,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self::Sysfs {
            root: default_cooling_root(),
        }
    }
}

impl ActuatorConfig {
    pub fn build(&self) -> Box<dyn CoolingActuator> {
        match self {
            Self::Sysfs { root } => Box::new(SysfsCoolingActuator::new(root.clone())),
            Self::DryRun => Box::new(DryRunActuator::new()),
        }
    }
}

/// Static governor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GovernorConfig {
    /// Idle time between iterations.
    pub poll_interval_ms: u64,
    /// Number of samples in the moving average.
    pub average_capacity: usize,
    /// Degrees added to a sample that is above the moving average.
    pub margin: f64,
    /// Every device the governor commands, in command order.
    pub devices: Vec<DeviceId>,
    /// Zones in evaluation order; the last match wins.
    pub zones: ThermalZoneTable,
    pub sensor: SensorConfig,
    pub actuator: ActuatorConfig,
    /// Consecutive failed reads tolerated before the loop gives up.
    pub sensor_retries: u32,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            average_capacity: DEFAULT_AVERAGE_CAPACITY,
            margin: DEFAULT_MARGIN,
            devices: [3, 4, 5, 6, 7].into_iter().map(DeviceId).collect(),
            zones: reference_zones(),
            sensor: SensorConfig::default(),
            actuator: ActuatorConfig::default(),
            sensor_retries: 0,
        }
    }
}

/// Reference zone table. Adjacent zones share their boundary temperature.
fn reference_zones() -> ThermalZoneTable {
    ThermalZoneTable::from_trusted(vec![
        ThermalZone::new(73.0, 110.0, [3u64, 6, 7]),
        ThermalZone::new(60.0, 73.0, [3u64, 4, 6, 7]),
        ThermalZone::new(30.0, 60.0, [3u64, 4, 5, 6, 7]),
    ])
}

impl GovernorConfig {
    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate a JSON configuration string.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the governor relies on.
    pub fn validate(&self) -> Result<()> {
        if self.average_capacity == 0 {
            return Err(Error::Config("average_capacity must be at least 1".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be positive".into()));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(Error::Config(format!(
                "margin must be a finite non-negative number, got {}",
                self.margin
            )));
        }
        if self.devices.is_empty() {
            return Err(Error::Config("device registry is empty".into()));
        }

        let mut seen = HashSet::new();
        for device in &self.devices {
            if !seen.insert(*device) {
                return Err(Error::Config(format!(
                    "device {device} listed twice in the registry"
                )));
            }
        }
        for (index, zone) in self.zones.zones().iter().enumerate() {
            if let Some(unknown) = zone.devices.iter().find(|d| !seen.contains(*d)) {
                return Err(Error::Config(format!(
                    "zone {index} references device {unknown}, which is not in the registry"
                )));
            }
        }

        if let SensorConfig::Acpi { label, timeout_ms } = &self.sensor {
            if label.trim().is_empty() {
                return Err(Error::Config("acpi sensor label is empty".into()));
            }
            if *timeout_ms == 0 {
                return Err(Error::Config("acpi sensor timeout_ms must be positive".into()));
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn moving_average(&self) -> Result<MovingAverage> {
        MovingAverage::new(self.average_capacity)
    }

    pub fn classifier(&self) -> ZoneClassifier {
        ZoneClassifier::new(self.zones.clone(), self.devices.clone(), self.margin)
    }
}
