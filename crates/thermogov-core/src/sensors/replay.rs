//! ReplaySensor — plays back a fixed sequence of readings, for dry runs and
//! tests.

use std::collections::VecDeque;

use crate::error::SensorError;
use crate::sensor::{SensorInfo, SensorKind, TemperatureSensor};

pub struct ReplaySensor {
    info: SensorInfo,
    readings: VecDeque<f64>,
    reads: usize,
}

impl ReplaySensor {
    pub fn new(readings: impl IntoIterator<Item = f64>) -> Self {
        Self {
            info: SensorInfo {
                name: "replay",
                description: "Plays back a fixed list of temperatures, then fails",
                kind: SensorKind::Synthetic,
            },
            readings: readings.into_iter().collect(),
            reads: 0,
        }
    }

    /// Readings not yet returned.
    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl TemperatureSensor for ReplaySensor {
    fn info(&self) -> &SensorInfo {
        &self.info
    }

    fn is_available(&self) -> bool {
        true
    }

    /// Values are returned as given, non-finite ones included; the governor
    /// is responsible for rejecting them.
    fn read(&mut self) -> Result<f64, SensorError> {
        let value = self
            .readings
            .pop_front()
            .ok_or(SensorError::Exhausted { reads: self.reads })?;
        self.reads += 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_then_fails() {
        let mut sensor = ReplaySensor::new([50.0, 51.5]);
        assert_eq!(sensor.remaining(), 2);
        assert_eq!(sensor.read().unwrap(), 50.0);
        assert_eq!(sensor.read().unwrap(), 51.5);
        assert!(matches!(
            sensor.read(),
            Err(SensorError::Exhausted { reads: 2 })
        ));
    }
}
