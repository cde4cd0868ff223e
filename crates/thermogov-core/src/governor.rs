//! The control loop.
//!
//! Each iteration:
//! 1. Read the sensor (a failure ends the iteration before anything else)
//! 2. Fold the sample into the moving average
//! 3. Bias and classify against the zone table
//! 4. Issue every resulting command; a failing device is logged and skipped
//! 5. Idle for the poll interval
//!
//! [`Governor::step`] performs steps 1–4 once and reports what happened.
//! [`Governor::run`] alternates sampling and idling until the shutdown flag is
//! cleared, an iteration limit is reached, or the sensor fails more times in a
//! row than the configuration tolerates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::actuator::CoolingActuator;
use crate::average::MovingAverage;
use crate::classifier::{Classification, ZoneClassifier};
use crate::config::GovernorConfig;
use crate::error::{Error, Result};
use crate::sensor::{TemperatureSensor, ensure_finite};

/// Longest single sleep while idling, so a shutdown request is noticed
/// promptly.
const IDLE_SLICE: Duration = Duration::from_millis(50);

/// What one iteration observed and did.
#[derive(Debug, Clone, Serialize)]
pub struct IterationReport {
    /// 1-based iteration number.
    pub iteration: u64,
    /// Moving average after folding in this sample.
    pub mean: f64,
    pub classification: Classification,
    /// Commands whose actuation failed.
    pub actuation_failures: usize,
}

impl IterationReport {
    pub fn sample(&self) -> f64 {
        self.classification.raw
    }
}

/// Totals for a [`Governor::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Iterations attempted, including ones whose sensor read failed.
    pub iterations: u64,
    pub commands_issued: u64,
    pub actuation_failures: u64,
    /// Sensor failures that were retried.
    pub sensor_failures: u64,
    /// Iterations in which the temperature matched no zone.
    pub unmatched_iterations: u64,
}

impl RunSummary {
    fn record(&mut self, report: &IterationReport) {
        self.commands_issued += report.classification.commands.len() as u64;
        self.actuation_failures += report.actuation_failures as u64;
        if report.classification.is_unmatched() {
            self.unmatched_iterations += 1;
        }
    }
}

/// Sample/decide/act loop over a sensor and an actuator.
pub struct Governor<S, A> {
    sensor: S,
    actuator: A,
    average: MovingAverage,
    classifier: ZoneClassifier,
    poll_interval: Duration,
    sensor_retries: u32,
    iterations: u64,
}

impl<S: TemperatureSensor, A: CoolingActuator> Governor<S, A> {
    /// Build a governor from a validated configuration.
    pub fn new(config: &GovernorConfig, sensor: S, actuator: A) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sensor,
            actuator,
            average: config.moving_average()?,
            classifier: config.classifier(),
            poll_interval: config.poll_interval(),
            sensor_retries: config.sensor_retries,
            iterations: 0,
        })
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn average(&self) -> &MovingAverage {
        &self.average
    }

    pub fn classifier(&self) -> &ZoneClassifier {
        &self.classifier
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run one sample/decide/act iteration.
    ///
    /// A sensor failure is returned before the average is touched or any
    /// device is commanded. Actuation failures never fail the step; they are
    /// logged and counted in the report.
    pub fn step(&mut self) -> Result<IterationReport> {
        self.iterations += 1;
        let iteration = self.iterations;

        let sample = self.sensor.read().and_then(ensure_finite)?;
        self.average.update(sample);
        let mean = self.average.mean()?;

        let classification = self.classifier.classify(sample, mean);
        log::debug!(
            "#{iteration}: sample {sample:.1}, mean {mean:.2}, effective {:.1}, zones {:?}",
            classification.effective,
            classification.matched_zones
        );
        if classification.is_unmatched() {
            log::info!(
                "#{iteration}: {:.1}°C is outside every zone; no devices commanded",
                classification.effective
            );
        }

        let mut actuation_failures = 0;
        for command in &classification.commands {
            if let Err(e) = self.actuator.apply(command.device, command.state) {
                log::warn!("#{iteration}: {e}; continuing with remaining devices");
                actuation_failures += 1;
            }
        }

        Ok(IterationReport {
            iteration,
            mean,
            classification,
            actuation_failures,
        })
    }

    /// Loop until `running` is cleared or `max_iterations` have been attempted.
    ///
    /// Returns the sensor error once more than `sensor_retries` consecutive
    /// reads have failed; the caller decides whether that ends the process.
    pub fn run(
        &mut self,
        running: &AtomicBool,
        max_iterations: Option<u64>,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut consecutive_failures = 0u32;
        let limit_reached =
            |summary: &RunSummary| max_iterations.is_some_and(|max| summary.iterations >= max);

        log::info!(
            "governor started: {} zone(s), {} device(s), {}-sample average, polling every {}ms",
            self.classifier.zones().len(),
            self.classifier.devices().len(),
            self.average.capacity(),
            self.poll_interval.as_millis()
        );

        while running.load(Ordering::SeqCst) && !limit_reached(&summary) {
            summary.iterations += 1;
            match self.step() {
                Ok(report) => {
                    consecutive_failures = 0;
                    summary.record(&report);
                }
                Err(Error::SensorReadFailure(e)) if consecutive_failures < self.sensor_retries => {
                    consecutive_failures += 1;
                    summary.sensor_failures += 1;
                    log::warn!(
                        "sensor read failed ({consecutive_failures}/{} retries): {e}",
                        self.sensor_retries
                    );
                }
                Err(e) => {
                    log::error!(
                        "governor stopping after {} iteration(s): {e}",
                        summary.iterations
                    );
                    return Err(e);
                }
            }

            if !limit_reached(&summary) {
                self.idle(running);
            }
        }

        log::info!(
            "governor stopped after {} iteration(s), {} command(s) issued",
            summary.iterations,
            summary.commands_issued
        );
        Ok(summary)
    }

    /// Sleep for the poll interval, waking early if `running` is cleared.
    fn idle(&self, running: &AtomicBool) {
        let deadline = Instant::now() + self.poll_interval;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !running.load(Ordering::SeqCst) {
                break;
            }
            std::thread::sleep(remaining.min(IDLE_SLICE));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::actuators::DryRunActuator;
    use crate::classifier::{Command, CoolingState};
    use crate::error::{ActuationError, SensorError};
    use crate::sensors::ReplaySensor;
    use crate::zone::DeviceId;

    /// Fails for a fixed set of devices and records every successful command.
    #[derive(Default)]
    struct FlakyActuator {
        broken: HashSet<DeviceId>,
        attempted: Vec<DeviceId>,
        applied: Vec<Command>,
    }

    impl CoolingActuator for FlakyActuator {
        fn apply(&mut self, device: DeviceId, state: CoolingState) -> Result<(), ActuationError> {
            self.attempted.push(device);
            if self.broken.contains(&device) {
                return Err(ActuationError {
                    device,
                    path: format!("/fake/cooling_device{device}/cur_state").into(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            self.applied.push(Command { device, state });
            Ok(())
        }
    }

    fn config(capacity: usize) -> GovernorConfig {
        GovernorConfig {
            average_capacity: capacity,
            poll_interval_ms: 1,
            ..GovernorConfig::default()
        }
    }

    fn on_devices(report: &IterationReport) -> Vec<u64> {
        report
            .classification
            .final_states()
            .into_iter()
            .filter(|(_, s)| s.is_on())
            .map(|(d, _)| d.0)
            .collect()
    }

    #[test]
    fn steady_reading_is_not_biased() {
        let sensor = ReplaySensor::new([70.0, 70.0, 70.0]);
        let mut gov = Governor::new(&config(3), sensor, DryRunActuator::new()).unwrap();
        gov.step().unwrap();
        gov.step().unwrap();
        let report = gov.step().unwrap();
        assert_eq!(report.iteration, 3);
        assert_eq!(report.mean, 70.0);
        assert_eq!(report.classification.effective, 70.0);
        assert_eq!(on_devices(&report), vec![3, 4, 6, 7]);
        assert_eq!(gov.actuator().issued().len(), 15);
    }

    #[test]
    fn spike_is_biased_into_the_hot_zone() {
        let sensor = ReplaySensor::new([50.0, 50.0, 50.0, 80.0]);
        let mut gov = Governor::new(&config(3), sensor, DryRunActuator::new()).unwrap();
        for _ in 0..3 {
            gov.step().unwrap();
        }
        let report = gov.step().unwrap();
        assert_eq!(report.sample(), 80.0);
        assert!((report.mean - 60.0).abs() < 1e-9);
        assert_eq!(report.classification.effective, 85.0);
        assert_eq!(report.classification.matched_zones, vec![0]);
        assert_eq!(on_devices(&report), vec![3, 6, 7]);
    }

    #[test]
    fn sensor_failure_stops_before_any_actuation() {
        let sensor = ReplaySensor::new(Vec::<f64>::new());
        let mut gov = Governor::new(&config(3), sensor, DryRunActuator::new()).unwrap();
        let err = gov.step().unwrap_err();
        assert!(matches!(
            err,
            Error::SensorReadFailure(SensorError::Exhausted { .. })
        ));
        assert!(gov.average().is_empty());
        assert!(gov.actuator().issued().is_empty());
    }

    #[test]
    fn non_finite_reading_is_a_sensor_failure() {
        let sensor = ReplaySensor::new([f64::NAN]);
        let mut gov = Governor::new(&config(3), sensor, DryRunActuator::new()).unwrap();
        assert!(matches!(
            gov.step(),
            Err(Error::SensorReadFailure(SensorError::NonFinite(_)))
        ));
        assert!(gov.average().is_empty());
        assert!(gov.actuator().issued().is_empty());
    }

    #[test]
    fn broken_device_does_not_block_the_rest() {
        let actuator = FlakyActuator {
            broken: [DeviceId(4)].into_iter().collect(),
            ..FlakyActuator::default()
        };
        let sensor = ReplaySensor::new([45.0, 45.0]);
        let mut gov = Governor::new(&config(3), sensor, actuator).unwrap();

        let report = gov.step().unwrap();
        assert_eq!(report.actuation_failures, 1);
        let attempted: Vec<u64> = gov.actuator().attempted.iter().map(|d| d.0).collect();
        assert_eq!(attempted, vec![3, 4, 5, 6, 7]);
        assert_eq!(gov.actuator().applied.len(), 4);

        // The next iteration still runs and still tries every device.
        let report = gov.step().unwrap();
        assert_eq!(report.actuation_failures, 1);
        assert_eq!(gov.actuator().attempted.len(), 10);
    }

    #[test]
    fn unmatched_temperature_issues_nothing() {
        let sensor = ReplaySensor::new([10.0]);
        let mut gov = Governor::new(&config(3), sensor, DryRunActuator::new()).unwrap();
        let report = gov.step().unwrap();
        assert!(report.classification.is_unmatched());
        assert!(gov.actuator().issued().is_empty());
    }

    #[test]
    fn run_stops_at_iteration_limit() {
        let sensor = ReplaySensor::new([45.0; 10]);
        let mut gov = Governor::new(&config(4), sensor, DryRunActuator::new()).unwrap();
        let running = AtomicBool::new(true);
        let summary = gov.run(&running, Some(3)).unwrap();
        assert_eq!(summary.iterations, 3);
        assert_eq!(summary.commands_issued, 15);
        assert_eq!(gov.sensor().remaining(), 7);
    }

    #[test]
    fn run_does_nothing_once_shutdown_requested() {
        let sensor = ReplaySensor::new([45.0]);
        let mut gov = Governor::new(&config(4), sensor, DryRunActuator::new()).unwrap();
        let running = AtomicBool::new(false);
        let summary = gov.run(&running, None).unwrap();
        assert_eq!(summary, RunSummary::default());
        assert_eq!(gov.sensor().remaining(), 1);
    }

    #[test]
    fn shutdown_during_idle_is_noticed_promptly() {
        let sensor = ReplaySensor::new([45.0; 4]);
        let cfg = GovernorConfig {
            poll_interval_ms: 30_000,
            ..config(4)
        };
        let mut gov = Governor::new(&cfg, sensor, DryRunActuator::new()).unwrap();
        let running = AtomicBool::new(true);

        let start = Instant::now();
        let summary = std::thread::scope(|s| {
            s.spawn(|| {
                std::thread::sleep(Duration::from_millis(100));
                running.store(false, Ordering::SeqCst);
            });
            gov.run(&running, None).unwrap()
        });
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(summary.iterations, 1);
        assert_eq!(gov.sensor().remaining(), 3);
    }

    #[test]
    fn dry_run_history_stays_bounded_across_many_steps() {
        let sensor = ReplaySensor::new(std::iter::repeat_n(45.0, 20_000));
        let mut gov = Governor::new(&config(4), sensor, DryRunActuator::new()).unwrap();
        for _ in 0..20_000 {
            gov.step().unwrap();
        }
        assert_eq!(gov.actuator().total_issued(), 100_000);
        assert_eq!(
            gov.actuator().issued().len(),
            crate::actuators::DEFAULT_HISTORY
        );
    }

    #[test]
    fn run_propagates_sensor_failure_without_retries() {
        let sensor = ReplaySensor::new([45.0, 45.0]);
        let mut gov = Governor::new(&config(4), sensor, DryRunActuator::new()).unwrap();
        let running = AtomicBool::new(true);
        let err = gov.run(&running, None).unwrap_err();
        assert!(matches!(err, Error::SensorReadFailure(_)));
        assert_eq!(gov.actuator().issued().len(), 10);
    }

    #[test]
    fn run_retries_sensor_failures_when_configured() {
        let sensor = ReplaySensor::new([45.0, f64::NAN, f64::INFINITY, 45.0]);
        let cfg = GovernorConfig {
            sensor_retries: 2,
            ..config(4)
        };
        let mut gov = Governor::new(&cfg, sensor, DryRunActuator::new()).unwrap();
        let running = AtomicBool::new(true);
        let summary = gov.run(&running, Some(4)).unwrap();
        assert_eq!(summary.iterations, 4);
        assert_eq!(summary.sensor_failures, 2);
        assert_eq!(summary.commands_issued, 10);
        assert_eq!(gov.average().len(), 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = GovernorConfig {
            average_capacity: 0,
            ..GovernorConfig::default()
        };
        let sensor = ReplaySensor::new(Vec::<f64>::new());
        assert!(Governor::new(&cfg, sensor, DryRunActuator::new()).is_err());
    }
}
