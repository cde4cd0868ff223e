//! `thermogov classify` — evaluate the zone table without touching hardware.

use super::{load_config, print_classification};

pub fn run(temp: f64, mean: Option<f64>, config_path: Option<&str>) {
    let mean = mean.unwrap_or(temp);
    if !temp.is_finite() || !mean.is_finite() {
        eprintln!("Error: temperatures must be finite");
        std::process::exit(1);
    }

    let config = load_config(config_path);
    let classifier = config.classifier();
    let classification = classifier.classify(temp, mean);

    println!("Temperature: {temp:.1}°C (average {mean:.1}°C)");
    print_classification(&classification, &config);
}
