//! Structured logging for the object generator.
//!
//! Console output with timestamps and module paths, plus optional JSON file
//! logging for post-mortem analysis of a generation run. The configured log
//! level is used unless `RUST_LOG` is set.

use forge_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// What [`init_logging`] installs, before `RUST_LOG` is consulted.
#[derive(Debug, PartialEq)]
struct LogSettings<'a> {
    filter: &'a str,
    file_logging: bool,
}

impl<'a> LogSettings<'a> {
    fn resolve(debug_build: bool, config: Option<&'a Config>) -> Self {
        Self {
            filter: config
                .map(|c| c.debug.log_level.as_str())
                .filter(|level| !level.is_empty())
                .unwrap_or(DEFAULT_FILTER),
            file_logging: debug_build || config.is_some_and(|c| c.debug.file_logging),
        }
    }
}

/// Initialize the tracing subscriber.
///
/// * `log_dir` - Optional directory for the JSON log file
/// * `debug_build` - Enables JSON file logging (as does `debug.file_logging`)
/// * `config` - Optional configuration providing the log level and the
///   `file_logging` switch
///
/// # Examples
///
/// ```no_run
/// use forge_log::init_logging;
///
/// init_logging(None, false, None);
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let LogSettings {
        filter,
        file_logging,
    } = LogSettings::resolve(debug_build, config);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if file_logging
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("forge.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
