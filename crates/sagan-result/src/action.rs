//! What to do when a result reports a problem.

use crate::error::{ResultError, Result};
use sagan_proto::DecodeOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reaction to an error or a malformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Flag the problem silently.
    Ignore,
    /// Flag the problem and log a warning.
    #[default]
    Warn,
    /// Stop and return the problem as an error.
    Fail,
}

impl Action {
    /// Returns the lowercase name used in configuration files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }

    pub(crate) fn apply(self, problem: Problem, message: &str) -> Result<()> {
        match self {
            Self::Ignore => Ok(()),
            Self::Warn => {
                match problem {
                    Problem::Error => tracing::warn!(error = %message, "Measurement reported an error"),
                    Problem::Malformation => tracing::warn!(reason = %message, "Malformed measurement"),
                }
                Ok(())
            }
            Self::Fail => Err(match problem {
                Problem::Error => ResultError::Error(message.to_string()),
                Problem::Malformation => ResultError::Malformed(message.to_string()),
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Problem {
    Error,
    Malformation,
}

/// Options threaded from a result into its responses and their buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Reaction to errors reported by the measurement.
    pub on_error: Action,

    /// Reaction to results or buffers that do not decode cleanly.
    pub on_malformation: Action,

    /// Decode `abuf`/`qbuf` strings. When false, messages are rebuilt from
    /// the flat result fields instead.
    pub parse_buf: bool,

    /// Sections to keep when decoding buffers.
    pub decode: DecodeOptions,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            on_error: Action::Warn,
            on_malformation: Action::Warn,
            parse_buf: true,
            decode: DecodeOptions::default(),
        }
    }
}

impl ParseOptions {
    /// Options that fail on any problem.
    pub const fn strict() -> Self {
        Self {
            on_error: Action::Fail,
            on_malformation: Action::Fail,
            parse_buf: true,
            decode: DecodeOptions::ALL,
        }
    }
}

/// Problem flags carried by results and responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    /// The measurement reported an error.
    pub is_error: bool,

    /// Text of the last reported error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Something in the result was not in the expected shape.
    pub is_malformed: bool,
}

impl Status {
    /// Flags an error, after applying `action` to it.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::Error`] if `action` is [`Action::Fail`].
    pub fn error(&mut self, action: Action, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        action.apply(Problem::Error, &message)?;
        self.is_error = true;
        self.error_message = Some(message);
        Ok(())
    }

    /// Flags a malformation, after applying `action` to it.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::Malformed`] if `action` is [`Action::Fail`].
    pub fn malformation(&mut self, action: Action, message: impl AsRef<str>) -> Result<()> {
        action.apply(Problem::Malformation, message.as_ref())?;
        self.is_malformed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.on_error, Action::Warn);
        assert_eq!(options.on_malformation, Action::Warn);
        assert!(options.parse_buf);
        assert_eq!(options.decode, DecodeOptions::ALL);
    }

    #[test]
    fn test_options_from_json() {
        let options: ParseOptions =
            serde_json::from_str(r#"{"on_error": "fail", "parse_buf": false, "decode": {"additionals": false}}"#)
                .unwrap();
        assert_eq!(options.on_error, Action::Fail);
        assert_eq!(options.on_malformation, Action::Warn);
        assert!(!options.parse_buf);
        assert!(!options.decode.additionals);
        assert!(options.decode.answers);
    }

    #[test]
    fn test_status_flags() {
        let mut status = Status::default();
        status.error(Action::Ignore, "Timeout: 5000").unwrap();
        assert!(status.is_error);
        assert_eq!(status.error_message.as_deref(), Some("Timeout: 5000"));
        assert!(!status.is_malformed);

        status.malformation(Action::Warn, "Unknown firmware: 0").unwrap();
        assert!(status.is_malformed);
    }

    #[test]
    fn test_fail_leaves_flags_clear() {
        let mut status = Status::default();
        let err = status.error(Action::Fail, "Timeout: 1").unwrap_err();
        assert!(matches!(err, ResultError::Error(ref text) if text == "Timeout: 1"));
        assert!(!status.is_error);

        let err = status.malformation(Action::Fail, "bad").unwrap_err();
        assert!(matches!(err, ResultError::Malformed(_)));
        assert!(!status.is_malformed);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::Fail.to_string(), "fail");
        let parsed: Action = serde_json::from_str("\"ignore\"").unwrap();
        assert_eq!(parsed, Action::Ignore);
    }
}
