use std::sync::OnceLock;

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    #[value(alias = "none")]
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_tracing_level(&self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Sends log output to stderr so stdout stays reserved for command output.
///
/// An explicit level wins over `RUST_LOG`, which wins over `warn`.
pub fn init(cli_override: Option<LogLevel>) {
    INIT.get_or_init(|| {
        let level = match cli_override {
            Some(level) => match level.as_tracing_level() {
                Some(level) => Some(level),
                None => return,
            },
            None => None,
        };
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(UtcTime::rfc_3339())
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(build_env_filter(level, rust_log.as_deref()))
            .with(stderr_layer)
            .init();
    });
}

fn build_env_filter(cli_override: Option<Level>, rust_log: Option<&str>) -> EnvFilter {
    match cli_override {
        Some(level) => EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy(""),
        None => EnvFilter::builder()
            .with_default_directive(Level::WARN.into())
            .parse_lossy(rust_log.unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!(LogLevel::from_str("off", true), Ok(LogLevel::Off));
        assert_eq!(LogLevel::from_str("none", true), Ok(LogLevel::Off));
        assert_eq!(LogLevel::from_str("DEBUG", true), Ok(LogLevel::Debug));
        assert!(LogLevel::from_str("nonsense", true).is_err());
    }

    #[test]
    fn test_flag_level_wins_over_rust_log() {
        let filter = build_env_filter(Some(Level::DEBUG), Some("error"));
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_rust_log_used_without_flag() {
        let filter = build_env_filter(None, Some("error"));
        assert_eq!(filter.to_string(), "error");
    }

    #[test]
    fn test_defaults_to_warn() {
        assert_eq!(build_env_filter(None, None).to_string(), "warn");
        assert_eq!(build_env_filter(None, Some("")).to_string(), "warn");
    }

    #[test]
    fn test_off_has_no_tracing_level() {
        assert_eq!(LogLevel::Off.as_tracing_level(), None);
        assert_eq!(LogLevel::default().as_tracing_level(), Some(Level::WARN));
    }
}
