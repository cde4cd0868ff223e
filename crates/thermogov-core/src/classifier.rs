//! Zone classification: turn a temperature sample into cooling-device commands.
//!
//! Two steps:
//!
//! 1. **Bias.** When the raw sample is above the moving average the reading is
//!    trending up, so it is treated as `margin` degrees hotter than measured.
//!    Cooling engages earlier on a rising edge and the zone boundaries behave
//!    a little like hysteresis.
//! 2. **Zone scan.** Every zone containing the biased temperature, in
//!    configuration order, emits one command per registered device: ON if the
//!    zone lists the device, OFF otherwise. Overlapping zones therefore emit
//!    several commands for the same device and the last one wins. A
//!    temperature outside every zone emits nothing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::zone::{DeviceId, ThermalZoneTable};

/// Desired state of a cooling device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoolingState {
    On,
    Off,
}

impl CoolingState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Value written to a cooling device's `cur_state` file.
    pub fn sysfs_value(self) -> &'static str {
        match self {
            Self::On => "1",
            Self::Off => "0",
        }
    }
}

impl From<bool> for CoolingState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl fmt::Display for CoolingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
        }
    }
}

/// One actuation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub device: DeviceId,
    pub state: CoolingState,
}

/// Outcome of classifying a single sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub raw: f64,
    pub mean: f64,
    /// Temperature the zones were evaluated against.
    pub effective: f64,
    /// Whether the margin changed the temperature: the sample was above the
    /// mean and the margin is non-zero.
    pub biased: bool,
    /// Indices of the matched zones, in configuration order.
    pub matched_zones: Vec<usize>,
    /// Commands in issue order, one block of registry-length per matched zone.
    pub commands: Vec<Command>,
}

impl Classification {
    /// State each device ends up in once every command has been applied.
    pub fn final_states(&self) -> BTreeMap<DeviceId, CoolingState> {
        self.commands
            .iter()
            .map(|c| (c.device, c.state))
            .collect()
    }

    /// No zone matched, so nothing will be actuated this round.
    pub fn is_unmatched(&self) -> bool {
        self.matched_zones.is_empty()
    }
}

/// Applies the bias and zone scan over an immutable zone table and device
/// registry.
#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    zones: ThermalZoneTable,
    devices: Vec<DeviceId>,
    margin: f64,
}

impl ZoneClassifier {
    pub fn new(zones: ThermalZoneTable, devices: Vec<DeviceId>, margin: f64) -> Self {
        Self {
            zones,
            devices,
            margin,
        }
    }

    pub fn zones(&self) -> &ThermalZoneTable {
        &self.zones
    }

    pub fn devices(&self) -> &[DeviceId] {
        &self.devices
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Effective temperature: `raw + margin` if `raw > mean`, else `raw`.
    pub fn bias(&self, raw: f64, mean: f64) -> f64 {
        if raw > mean { raw + self.margin } else { raw }
    }

    pub fn classify(&self, raw: f64, mean: f64) -> Classification {
        let effective = self.bias(raw, mean);
        let matched_zones: Vec<usize> = self.zones.matching(effective).collect();

        let mut commands = Vec::with_capacity(matched_zones.len() * self.devices.len());
        for &index in &matched_zones {
            let zone = &self.zones.zones()[index];
            commands.extend(self.devices.iter().map(|&device| Command {
                device,
                state: zone.has_device(device).into(),
            }));
        }

        Classification {
            raw,
            mean,
            effective,
            biased: effective != raw,
            matched_zones,
            commands,
        }
    }
}
