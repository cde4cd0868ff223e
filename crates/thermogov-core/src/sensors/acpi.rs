//! AcpiSensor — runs `acpi -t`, picks the line for one thermal sensor
//! (e.g. `Thermal 1: ok, 47.0 degrees C`) and extracts its temperature.

use std::time::Duration;

use crate::error::SensorError;
use crate::sensor::{SensorInfo, SensorKind, TemperatureSensor, ensure_finite};

use super::helpers::{command_exists, first_decimal, run_command};

/// Name of the acpi binary, looked up on `PATH`.
const ACPI_PROGRAM: &str = "acpi";

pub const DEFAULT_LABEL: &str = "Thermal 1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

pub struct AcpiSensor {
    info: SensorInfo,
    label: String,
    timeout: Duration,
}

impl AcpiSensor {
    pub fn new(label: impl Into<String>, timeout: Duration) -> Self {
        Self {
            info: SensorInfo {
                name: "acpi",
                description: "Parses one thermal line of `acpi -t` output (needs the acpi utility)",
                kind: SensorKind::Command,
            },
            label: label.into(),
            timeout,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for AcpiSensor {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL, DEFAULT_TIMEOUT)
    }
}

/// Extract the temperature for `label` from `acpi -t` output.
///
/// Lines are matched by substring, so `"Thermal 1"` also selects
/// `"Thermal 10"` if it appears first; acpi lists sensors in index order.
pub fn parse_acpi_output(output: &str, label: &str) -> Result<f64, SensorError> {
    let line = output
        .lines()
        .find(|line| line.contains(label))
        .ok_or_else(|| SensorError::LabelNotFound {
            label: label.to_string(),
        })?;
    // Skip past the label itself so its index digits are never parsed.
    let rest = line.split_once(label).map_or(line, |(_, rest)| rest);
    let value = first_decimal(rest).ok_or_else(|| SensorError::Parse {
        raw: line.trim().to_string(),
    })?;
    ensure_finite(value)
}

impl TemperatureSensor for AcpiSensor {
    fn info(&self) -> &SensorInfo {
        &self.info
    }

    fn is_available(&self) -> bool {
        command_exists(ACPI_PROGRAM)
    }

    fn read(&mut self) -> Result<f64, SensorError> {
        let output = run_command(ACPI_PROGRAM, &["-t"], self.timeout)?;
        parse_acpi_output(&output, &self.label)
    }
}
