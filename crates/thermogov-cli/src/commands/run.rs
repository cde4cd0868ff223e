//! `thermogov run` — drive cooling devices until interrupted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{load_config, make_governor};

pub fn run(config_path: Option<&str>, dry_run: bool, iterations: Option<u64>) {
    let config = load_config(config_path);

    println!("Thermal governor");
    println!("  Sensor:    {}", describe_sensor(&config.sensor));
    println!(
        "  Actuator:  {}",
        if dry_run {
            "dry run (commands are logged only)".to_string()
        } else {
            describe_actuator(&config.actuator)
        }
    );
    println!("  Average:   {} samples", config.average_capacity);
    println!("  Interval:  {}ms", config.poll_interval_ms);
    println!("  Margin:    +{:.1}°C when above average", config.margin);
    for (i, zone) in config.zones.zones().iter().enumerate() {
        println!("  Zone {i}:    {zone}");
    }
    match iterations {
        Some(n) => println!("  Stop:      after {n} iteration(s)"),
        None => println!("  Stop:      Ctrl+C"),
    }
    println!();

    let mut governor = make_governor(config, dry_run);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl+C handler: {e}");
        std::process::exit(1);
    }

    match governor.run(&running, iterations) {
        Ok(summary) => {
            println!();
            println!("Stopped after {} iteration(s)", summary.iterations);
            println!("  Commands issued:     {}", summary.commands_issued);
            println!("  Actuation failures:  {}", summary.actuation_failures);
            println!("  Sensor retries:      {}", summary.sensor_failures);
            println!("  Outside every zone:  {}", summary.unmatched_iterations);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn describe_sensor(sensor: &thermogov_core::SensorConfig) -> String {
    use thermogov_core::SensorConfig;
    match sensor {
        SensorConfig::Acpi { label, timeout_ms } => {
            format!("acpi -t, line '{label}' (timeout {timeout_ms}ms)")
        }
        SensorConfig::Sysfs { root, zone } => {
            format!("{}/thermal_zone{zone}/temp", root.display())
        }
    }
}

fn describe_actuator(actuator: &thermogov_core::ActuatorConfig) -> String {
    use thermogov_core::ActuatorConfig;
    match actuator {
        ActuatorConfig::Sysfs { root } => {
            format!("{}/cooling_device<N>/cur_state", root.display())
        }
        ActuatorConfig::DryRun => "dry run (commands are logged only)".to_string(),
    }
}
