pub mod classify;
pub mod config;
pub mod once;
pub mod run;
pub mod sensors;
pub mod simulate;

use std::path::Path;

use thermogov_core::{
    ActuatorConfig, Classification, CoolingActuator, Governor, GovernorConfig, TemperatureSensor,
};

/// Governor over whatever sensor and actuator the configuration selects.
pub type DynGovernor = Governor<Box<dyn TemperatureSensor>, Box<dyn CoolingActuator>>;

/// Initialise `env_logger`; `RUST_LOG` takes precedence over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

/// Load and validate the configuration, or fall back to the built-in
/// reference configuration. Exits on error.
pub fn load_config(path: Option<&str>) -> GovernorConfig {
    let Some(path) = path else {
        return GovernorConfig::default();
    };
    match GovernorConfig::load(Path::new(path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    }
}

/// Build a governor from the configuration, swapping in the dry-run actuator
/// when requested. Exits on error.
pub fn make_governor(mut config: GovernorConfig, dry_run: bool) -> DynGovernor {
    if dry_run {
        config.actuator = ActuatorConfig::DryRun;
    }
    if matches!(config.actuator, ActuatorConfig::Sysfs { .. }) && !is_root() {
        log::warn!("not running as root; writes to cooling devices will probably fail");
    }

    let sensor = config.sensor.build();
    if !sensor.is_available() {
        log::warn!(
            "sensor '{}' does not look available on this machine",
            sensor.name()
        );
    }
    match Governor::new(&config, sensor, config.actuator.build()) {
        Ok(governor) => governor,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn is_root() -> bool {
    // SAFETY: `geteuid` has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Parse a comma-separated list of temperatures.
pub fn parse_samples(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid temperature '{t}'"))
        })
        .collect()
}

/// Devices that end up ON and OFF, as display strings.
pub fn split_final_states(classification: &Classification) -> (Vec<String>, Vec<String>) {
    let mut on = Vec::new();
    let mut off = Vec::new();
    for (device, state) in classification.final_states() {
        if state.is_on() {
            on.push(device.to_string());
        } else {
            off.push(device.to_string());
        }
    }
    (on, off)
}

/// Print a classification in the form shared by `once`, `classify` and
/// `simulate`.
pub fn print_classification(classification: &Classification, config: &GovernorConfig) {
    println!(
        "  Effective: {:.1}°C{}",
        classification.effective,
        if classification.biased {
            format!(" (raw {:.1} + margin {:.1})", classification.raw, config.margin)
        } else {
            String::new()
        }
    );
    if classification.is_unmatched() {
        println!("  Zones:     none matched; devices keep their last state");
        return;
    }
    let zones = config.zones.zones();
    for &index in &classification.matched_zones {
        println!("  Zone {index}:    {}", zones[index]);
    }
    let (on, off) = split_final_states(classification);
    println!("  ON:        {}", on.join(", "));
    println!("  OFF:       {}", off.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermogov_core::ZoneClassifier;

    fn reference_classifier() -> ZoneClassifier {
        GovernorConfig::default().classifier()
    }

    #[test]
    fn test_parse_samples() {
        assert_eq!(parse_samples("45,50.5, 80").unwrap(), vec![45.0, 50.5, 80.0]);
        assert_eq!(parse_samples("-3").unwrap(), vec![-3.0]);
        assert_eq!(parse_samples("70,").unwrap(), vec![70.0]);
    }

    #[test]
    fn test_parse_samples_rejects_garbage() {
        assert!(parse_samples("45,hot").is_err());
        assert!(parse_samples("NaN").is_err());
        assert!(parse_samples("inf").is_err());
    }

    #[test]
    fn test_split_final_states() {
        let c = reference_classifier().classify(70.0, 70.0);
        let (on, off) = split_final_states(&c);
        assert_eq!(on, vec!["3", "4", "6", "7"]);
        assert_eq!(off, vec!["5"]);
    }

    #[test]
    fn test_split_final_states_unmatched() {
        let c = reference_classifier().classify(5.0, 5.0);
        let (on, off) = split_final_states(&c);
        assert!(on.is_empty());
        assert!(off.is_empty());
    }

    #[test]
    fn test_load_config_default() {
        assert_eq!(load_config(None), GovernorConfig::default());
    }
}
