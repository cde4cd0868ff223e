//! SysfsZoneSensor — reads a kernel thermal zone's `temp` file, which holds
//! the temperature in millidegrees Celsius.

use std::path::{Path, PathBuf};

use crate::error::SensorError;
use crate::sensor::{SensorInfo, SensorKind, TemperatureSensor, ensure_finite};

pub const DEFAULT_THERMAL_ROOT: &str = "/sys/class/thermal";

pub struct SysfsZoneSensor {
    info: SensorInfo,
    path: PathBuf,
}

impl SysfsZoneSensor {
    /// Sensor for `<root>/thermal_zone<zone>/temp`.
    pub fn new(root: impl AsRef<Path>, zone: u32) -> Self {
        Self {
            info: SensorInfo {
                name: "sysfs_thermal_zone",
                description: "Reads a kernel thermal zone's temp file (millidegrees Celsius)",
                kind: SensorKind::Sysfs,
            },
            path: root
                .as_ref()
                .join(format!("thermal_zone{zone}"))
                .join("temp"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SysfsZoneSensor {
    fn default() -> Self {
        Self::new(DEFAULT_THERMAL_ROOT, 0)
    }
}

/// Convert the contents of a `temp` file to degrees Celsius.
pub fn parse_millidegrees(raw: &str) -> Result<f64, SensorError> {
    let trimmed = raw.trim();
    let milli: f64 = trimmed.parse().map_err(|_| SensorError::Parse {
        raw: trimmed.to_string(),
    })?;
    ensure_finite(milli / 1000.0)
}

impl TemperatureSensor for SysfsZoneSensor {
    fn info(&self) -> &SensorInfo {
        &self.info
    }

    fn is_available(&self) -> bool {
        self.path.exists()
    }

    fn read(&mut self) -> Result<f64, SensorError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| SensorError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_millidegrees(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millidegrees_are_scaled() {
        assert_eq!(parse_millidegrees("47000\n").unwrap(), 47.0);
        assert_eq!(parse_millidegrees("  61500 ").unwrap(), 61.5);
        assert_eq!(parse_millidegrees("-5000").unwrap(), -5.0);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            parse_millidegrees("hot"),
            Err(SensorError::Parse { .. })
        ));
        assert!(matches!(
            parse_millidegrees(""),
            Err(SensorError::Parse { .. })
        ));
        assert!(matches!(
            parse_millidegrees("NaN"),
            Err(SensorError::NonFinite(_))
        ));
        assert!(matches!(
            parse_millidegrees("inf"),
            Err(SensorError::NonFinite(_))
        ));
    }

    #[test]
    fn reads_zone_file() {
        let root = tempfile::tempdir().unwrap();
        let zone = root.path().join("thermal_zone2");
        std::fs::create_dir(&zone).unwrap();
        std::fs::write(zone.join("temp"), "55250\n").unwrap();

        let mut sensor = SysfsZoneSensor::new(root.path(), 2);
        assert!(sensor.is_available());
        assert_eq!(sensor.read().unwrap(), 55.25);
    }

    #[test]
    fn missing_zone_is_an_io_error() {
        let root = tempfile::tempdir().unwrap();
        let mut sensor = SysfsZoneSensor::new(root.path(), 9);
        assert!(!sensor.is_available());
        assert!(matches!(sensor.read(), Err(SensorError::Io { .. })));
    }
}
