//! Logging configuration.

use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Levels accepted by `logging.level`.
pub const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Formats accepted by `logging.format`.
pub const FORMATS: [&str; 2] = ["text", "json"];

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: String,

    /// Log format (text, json).
    pub format: String,

    /// Log span open and close events.
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            span_events: false,
        }
    }
}

impl LoggingConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if !LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {}, got {:?}",
                LEVELS.join(", "),
                self.level
            )));
        }

        if !FORMATS.contains(&self.format.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.format must be text or json, got {:?}",
                self.format
            )));
        }

        Ok(())
    }

    /// Returns true if logs should be written as JSON lines.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_level() {
        let mut logging = LoggingConfig::default();
        assert!(logging.validate().is_ok());

        logging.level = "WARN".to_string();
        assert!(logging.validate().is_ok());

        logging.level = "loud".to_string();
        let err = logging.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_validate_format() {
        let mut logging = LoggingConfig {
            format: "JSON".to_string(),
            ..LoggingConfig::default()
        };
        assert!(logging.validate().is_ok());
        assert!(logging.is_json());

        logging.format = "xml".to_string();
        assert!(matches!(logging.validate(), Err(ConfigError::Validation(_))));
    }
}
