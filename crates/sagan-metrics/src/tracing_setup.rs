//! Tracing and logging setup.
//!
//! Logs always go to stderr so that decoded output on stdout stays clean.

use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level.
    pub level: Level,

    /// Log format ("text" or "json").
    pub format: LogFormat,

    /// Include span events.
    pub span_events: bool,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text format.
    Text,

    /// JSON format.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Text,
            span_events: false,
        }
    }
}

impl LogConfig {
    /// Builds a configuration from level and format names.
    ///
    /// Unknown names fall back to the defaults.
    pub fn from_names(level: &str, format: &str, span_events: bool) -> Self {
        let defaults = Self::default();
        Self {
            level: Level::from_str(level).unwrap_or(defaults.level),
            format: format.parse().unwrap_or(defaults.format),
            span_events,
        }
    }

    /// Only logs errors.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.level = Level::ERROR;
        self
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` directives override the configured level.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    match config.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(span_events),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(span_events),
            )
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names() {
        let config = LogConfig::from_names("debug", "JSON", true);
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.span_events);

        let config = LogConfig::from_names("loud", "xml", false);
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, LogFormat::Text);
    }

    #[test]
    fn test_quiet() {
        assert_eq!(LogConfig::default().quiet().level, Level::ERROR);
        assert_eq!(LogConfig::from_names("trace", "json", false).quiet().format, LogFormat::Json);
    }
}
