//! The `forge` command: generate object templates from a RON object spec.

mod run;

use std::process::ExitCode;

use clap::Parser;
use forge_config::{CliArgs, Config, default_config_dir};
use tracing::error;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to resolve config directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    forge_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run::run(&config, &args) {
        Ok(report) => {
            if args.dry_run {
                println!("dry run, nothing written");
            }
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", run::error_chain(&e));
            eprintln!("error: {}", run::error_chain(&e));
            ExitCode::FAILURE
        }
    }
}
