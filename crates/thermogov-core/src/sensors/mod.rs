//! Built-in temperature sensor implementations.

pub mod helpers;

pub mod acpi;
pub mod replay;
pub mod sysfs;

use crate::sensor::TemperatureSensor;

pub use acpi::AcpiSensor;
pub use replay::ReplaySensor;
pub use sysfs::SysfsZoneSensor;

/// All hardware-backed sensors with their default settings.
pub fn all_sensors() -> Vec<Box<dyn TemperatureSensor>> {
    vec![
        Box::new(AcpiSensor::default()),
        Box::new(SysfsZoneSensor::default()),
    ]
}

/// Built-in sensors that can operate on this machine.
pub fn detect_available_sensors() -> Vec<Box<dyn TemperatureSensor>> {
    all_sensors()
        .into_iter()
        .filter(|s| s.is_available())
        .collect()
}
