//! CLI for thermogov — a zone-based thermal governor.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "thermogov")]
#[command(about = "thermogov — moving-average thermal governor for sysfs cooling devices")]
#[command(version = thermogov_core::VERSION)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the governor loop until interrupted (Ctrl+C)
    Run {
        /// JSON configuration file (default: built-in reference configuration)
        #[arg(long)]
        config: Option<String>,

        /// Log cooling commands instead of writing them
        #[arg(long)]
        dry_run: bool,

        /// Stop after this many iterations
        #[arg(long)]
        iterations: Option<u64>,
    },

    /// Run a single iteration and print what was decided
    Once {
        /// JSON configuration file (default: built-in reference configuration)
        #[arg(long)]
        config: Option<String>,

        /// Log cooling commands instead of writing them
        #[arg(long)]
        dry_run: bool,

        /// Print the iteration report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a temperature offline: no sensor read, no actuation
    Classify {
        /// Raw temperature in °C
        #[arg(long, allow_hyphen_values = true)]
        temp: f64,

        /// Moving average to compare against (default: same as --temp, i.e. no bias)
        #[arg(long, allow_hyphen_values = true)]
        mean: Option<f64>,

        /// JSON configuration file (default: built-in reference configuration)
        #[arg(long)]
        config: Option<String>,
    },

    /// Feed a comma-separated temperature trace through the governor (dry run)
    Simulate {
        /// Temperatures in °C, e.g. "45,50,62.5,80"
        #[arg(long, allow_hyphen_values = true)]
        samples: String,

        /// JSON configuration file (default: built-in reference configuration)
        #[arg(long)]
        config: Option<String>,
    },

    /// List built-in temperature sensors and whether they work here
    Sensors {
        /// Take one reading from each available sensor
        #[arg(long)]
        read: bool,
    },

    /// Print the effective configuration as JSON
    Config {
        /// JSON configuration file to validate and print
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            dry_run,
            iterations,
        } => commands::run::run(config.as_deref(), dry_run, iterations),
        Commands::Once {
            config,
            dry_run,
            json,
        } => commands::once::run(config.as_deref(), dry_run, json),
        Commands::Classify { temp, mean, config } => {
            commands::classify::run(temp, mean, config.as_deref())
        }
        Commands::Simulate { samples, config } => {
            commands::simulate::run(&samples, config.as_deref())
        }
        Commands::Sensors { read } => commands::sensors::run(read),
        Commands::Config { config } => commands::config::run(config.as_deref()),
    }
}
