//! Thermal zones and the cooling devices they drive.
//!
//! A zone is an inclusive temperature interval plus the set of devices that
//! should be ON while the governing temperature lies inside it. Zones are
//! allowed to overlap, both in their bounds and in their device sets; the
//! table keeps them in configuration order because the classifier lets the
//! last matching zone win.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a kernel cooling device (`cooling_device<N>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DeviceId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Inclusive temperature interval with the devices it switches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalZone {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub devices: BTreeSet<DeviceId>,
}

impl ThermalZone {
    pub fn new<I, D>(lower_bound: f64, upper_bound: f64, devices: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DeviceId>,
    {
        Self {
            lower_bound,
            upper_bound,
            devices: devices.into_iter().map(Into::into).collect(),
        }
    }

    /// `lower_bound <= temperature <= upper_bound`.
    pub fn contains(&self, temperature: f64) -> bool {
        temperature >= self.lower_bound && temperature <= self.upper_bound
    }

    pub fn has_device(&self, device: DeviceId) -> bool {
        self.devices.contains(&device)
    }

    fn validate(&self, index: usize) -> Result<()> {
        if !self.lower_bound.is_finite() || !self.upper_bound.is_finite() {
            return Err(Error::Config(format!(
                "zone {index} has a non-finite bound [{}, {}]",
                self.lower_bound, self.upper_bound
            )));
        }
        if self.lower_bound > self.upper_bound {
            return Err(Error::Config(format!(
                "zone {index} lower bound {} exceeds upper bound {}",
                self.lower_bound, self.upper_bound
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ThermalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let devices: Vec<String> = self.devices.iter().map(ToString::to_string).collect();
        write!(
            f,
            "[{}, {}] -> {{{}}}",
            self.lower_bound,
            self.upper_bound,
            devices.join(", ")
        )
    }
}

/// Ordered, validated collection of thermal zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ThermalZone>", into = "Vec<ThermalZone>")]
pub struct ThermalZoneTable {
    zones: Vec<ThermalZone>,
}

impl ThermalZoneTable {
    /// Build a table, rejecting zones with non-finite or inverted bounds.
    pub fn new(zones: Vec<ThermalZone>) -> Result<Self> {
        for (index, zone) in zones.iter().enumerate() {
            zone.validate(index)?;
        }
        Ok(Self { zones })
    }

    /// Table from zones known to be well-formed, e.g. compiled-in defaults.
    pub(crate) fn from_trusted(zones: Vec<ThermalZone>) -> Self {
        debug_assert!(
            zones
                .iter()
                .enumerate()
                .all(|(index, zone)| zone.validate(index).is_ok())
        );
        Self { zones }
    }

    /// Zones in configuration order.
    pub fn zones(&self) -> &[ThermalZone] {
        &self.zones
    }

    /// Indices of every zone containing `temperature`, in configuration order.
    pub fn matching(&self, temperature: f64) -> impl Iterator<Item = usize> + '_ {
        self.zones
            .iter()
            .enumerate()
            .filter(move |(_, zone)| zone.contains(temperature))
            .map(|(index, _)| index)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl TryFrom<Vec<ThermalZone>> for ThermalZoneTable {
    type Error = Error;

    fn try_from(zones: Vec<ThermalZone>) -> Result<Self> {
        Self::new(zones)
    }
}

impl From<ThermalZoneTable> for Vec<ThermalZone> {
    fn from(table: ThermalZoneTable) -> Self {
        table.zones
    }
}
