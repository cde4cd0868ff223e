//! Replay a temperature trace through the governor without touching hardware.
//!
//! Prints the effective temperature and the resulting device states for each
//! sample.
//!
//! Run: `cargo run --example replay`

use thermogov_core::{DryRunActuator, Governor, GovernorConfig, ReplaySensor};

fn main() -> thermogov_core::Result<()> {
    let trace = [45.0, 47.5, 52.0, 58.0, 66.0, 71.0, 74.0, 70.0, 64.0, 59.0];

    let config = GovernorConfig {
        average_capacity: 4,
        ..GovernorConfig::default()
    };
    let mut governor = Governor::new(&config, ReplaySensor::new(trace), DryRunActuator::new())?;

    for _ in 0..trace.len() {
        let report = governor.step()?;
        let on: Vec<String> = report
            .classification
            .final_states()
            .into_iter()
            .filter(|(_, state)| state.is_on())
            .map(|(device, _)| device.to_string())
            .collect();
        println!(
            "sample {:>5.1}  mean {:>6.2}  effective {:>5.1}  on: [{}]",
            report.sample(),
            report.mean,
            report.classification.effective,
            on.join(", ")
        );
    }
    Ok(())
}
