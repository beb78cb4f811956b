//! Command-line argument parsing for the object generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Object generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "forge", about = "Generate object templates from artist assets")]
pub struct CliArgs {
    /// RON file describing the object to generate.
    #[arg(long)]
    pub spec: PathBuf,

    /// Base output folder (overrides `output.base_folder`).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Build everything in memory and print the summary without writing.
    #[arg(long)]
    pub dry_run: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref output) = args.output {
            self.output.base_folder = output.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(output: Option<&str>, log_level: Option<&str>) -> CliArgs {
        CliArgs {
            spec: PathBuf::from("rock.ron"),
            output: output.map(PathBuf::from),
            log_level: log_level.map(str::to_string),
            config: None,
            dry_run: false,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&args(Some("out/objects"), Some("debug")));
        assert_eq!(config.output.base_folder, PathBuf::from("out/objects"));
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.output.bush_folder, "Bushes");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&args(None, None));
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let parsed = CliArgs::try_parse_from([
            "forge",
            "--spec",
            "tree.ron",
            "--dry-run",
            "--log-level",
            "trace",
        ])
        .unwrap();
        assert_eq!(parsed.spec, PathBuf::from("tree.ron"));
        assert!(parsed.dry_run);
        assert_eq!(parsed.log_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_cli_requires_spec() {
        assert!(CliArgs::try_parse_from(["forge"]).is_err());
    }
}
