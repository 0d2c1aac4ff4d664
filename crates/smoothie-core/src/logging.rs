//! File logging for the native binary
//!
//! The keyboard compensator is the part most often debugged from a log, so
//! its handler logs at debug by default while everything else stays at info.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Result, ResultExt};

/// Environment variable controlling the log filter
pub const LOG_ENV_VAR: &str = "SMOOTHIE_LOG";

/// Used when `SMOOTHIE_LOG` is unset or blank
pub const DEFAULT_FILTER: &str = "smoothie_assistant=info,smoothie_app=info,\
smoothie_app::handler::keyboard=debug,smoothie_core=info,warn";

const LOG_FILE_PREFIX: &str = "smoothie.log";

/// Install the file subscriber.
///
/// Returns the directory the daily log files are written to,
/// `<data_local_dir>/smoothie-assistant/logs/`.
///
/// ```bash
/// SMOOTHIE_LOG=smoothie_app=trace smoothie chat
/// ```
pub fn init() -> Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Creating log directory {}", log_dir.display()))?;

    let directives = filter_directives(std::env::var(LOG_ENV_VAR).ok().as_deref());
    let env_filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Ignoring {}={:?}: {}", LOG_ENV_VAR, directives, e);
        EnvFilter::new(DEFAULT_FILTER)
    });

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new("%H:%M:%S%.3f".to_string())),
        )
        .init();

    tracing::info!("smoothie {} logging to {}", env!("CARGO_PKG_VERSION"), log_dir.display());
    Ok(log_dir)
}

/// Filter directives from the env value, falling back to [`DEFAULT_FILTER`]
pub fn filter_directives(env_value: Option<&str>) -> String {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smoothie-assistant")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_is_app_scoped() {
        assert!(log_directory().ends_with("smoothie-assistant/logs"));
    }

    #[test]
    fn test_blank_env_uses_default_filter() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("  ")), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_value_replaces_default_filter() {
        assert_eq!(filter_directives(Some(" smoothie_app=trace ")), "smoothie_app=trace");
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        assert!(DEFAULT_FILTER.contains("smoothie_app::handler::keyboard=debug"));
    }
}
