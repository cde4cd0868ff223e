//! `thermogov config` — validate and print the effective configuration.

use super::load_config;

pub fn run(config_path: Option<&str>) {
    let config = load_config(config_path);
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    match config.to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
