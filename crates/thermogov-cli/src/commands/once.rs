//! `thermogov once` — a single sample/decide/act iteration.

use super::{load_config, make_governor, print_classification};

pub fn run(config_path: Option<&str>, dry_run: bool, json: bool) {
    let config = load_config(config_path);
    let mut governor = make_governor(config.clone(), dry_run);

    let report = match governor.step() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Sample:      {:.1}°C ({})", report.sample(), governor.sensor().name());
    println!("  Mean:      {:.2}°C", report.mean);
    print_classification(&report.classification, &config);
    if report.actuation_failures > 0 {
        println!(
            "  Failed:    {} of {} command(s)",
            report.actuation_failures,
            report.classification.commands.len()
        );
    }
}
