//! `thermogov simulate` — replay a temperature trace through a dry-run governor.

use thermogov_core::{DryRunActuator, Governor, ReplaySensor};

use super::{load_config, parse_samples, split_final_states};

pub fn run(samples: &str, config_path: Option<&str>) {
    let trace = match parse_samples(samples) {
        Ok(t) if !t.is_empty() => t,
        Ok(_) => {
            eprintln!("Error: no samples given");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let config = load_config(config_path);
    let mut governor = match Governor::new(
        &config,
        ReplaySensor::new(trace.iter().copied()),
        DryRunActuator::new(),
    ) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "{:>4}  {:>7}  {:>7}  {:>9}  {:<12}  OFF",
        "#", "sample", "mean", "effective", "ON"
    );
    for _ in 0..trace.len() {
        let report = match governor.step() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };
        let c = &report.classification;
        let (on, off) = if c.is_unmatched() {
            (vec!["(hold)".to_string()], Vec::new())
        } else {
            split_final_states(c)
        };
        println!(
            "{:>4}  {:>7.1}  {:>7.2}  {:>8.1}{}  {:<12}  {}",
            report.iteration,
            report.sample(),
            report.mean,
            c.effective,
            if c.biased { "*" } else { " " },
            on.join(","),
            off.join(",")
        );
    }
    println!();
    println!(
        "{} command(s) would have been written; * = biased by +{:.1}°C",
        governor.actuator().total_issued(),
        config.margin
    );
}
