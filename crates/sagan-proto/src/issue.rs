//! Recoverable decode problems.
//!
//! A malformed buffer does not fail the decode. Each problem is recorded as
//! a [`DecodeIssue`] in an [`ErrorSink`] and the decoder carries on with
//! whatever can still be trusted.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The decoder stage that reported a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// The buffer string could not be base64-decoded.
    Base64,
    /// Fixed 12-byte header.
    Header,
    /// Question section entry.
    Question,
    /// Resource record envelope or RDATA.
    Record,
    /// Domain name decoding.
    Name,
    /// NSEC/NSEC3 type bitmap.
    TypesBitmap,
    /// Bytes left over after the last declared record.
    End,
}

impl Stage {
    /// Returns the stable text form of the stage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Header => "header",
            Self::Question => "question",
            Self::Record => "record",
            Self::Name => "name",
            Self::TypesBitmap => "types_bitmap",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded decode problem: where it happened and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeIssue {
    /// Stage that reported the problem.
    pub stage: Stage,
    /// Byte offset into the buffer.
    pub offset: usize,
    /// Human-readable description.
    pub message: String,
}

impl DecodeIssue {
    /// Creates a new issue.
    pub fn new(stage: Stage, offset: usize, message: impl Into<String>) -> Self {
        Self {
            stage,
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}: {}", self.stage, self.offset, self.message)
    }
}

/// Accumulator for decode issues, local to a single decode call.
#[derive(Debug, Default)]
pub struct ErrorSink {
    issues: Vec<DecodeIssue>,
}

impl ErrorSink {
    /// Creates an empty sink.
    pub const fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Records a problem.
    pub fn push(&mut self, stage: Stage, offset: usize, message: impl Into<String>) {
        self.issues.push(DecodeIssue::new(stage, offset, message));
    }

    /// Records an error returned by a decode step.
    ///
    /// The stage comes from the error itself when it has one (name and
    /// bitmap errors), otherwise from `stage`. `fallback_offset` is used
    /// when the error carries no offset.
    pub fn record(&mut self, stage: Stage, fallback_offset: usize, error: &Error) {
        let stage = error.stage_or(stage);
        let offset = error.offset().unwrap_or(fallback_offset);
        tracing::trace!(%stage, offset, %error, "decode issue");
        self.push(stage, offset, error.to_string());
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the number of recorded issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns the recorded issues.
    pub fn issues(&self) -> &[DecodeIssue] {
        &self.issues
    }

    /// Wraps a decoded value together with everything recorded so far.
    pub fn finish<T>(self, value: T) -> DecodeOutcome<T> {
        DecodeOutcome {
            value,
            errors: self.issues,
        }
    }
}

/// A decoded value plus the problems met while decoding it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome<T> {
    /// Best-effort decoded value.
    pub value: T,
    /// Problems recorded during decoding; empty for a clean decode.
    pub errors: Vec<DecodeIssue>,
}

impl<T> DecodeOutcome<T> {
    /// Returns true if the value was decoded without problems.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_records_error_stage_and_offset() {
        let mut sink = ErrorSink::new();
        sink.record(
            Stage::Record,
            99,
            &Error::PointerLoop {
                offset: 14,
                max_jumps: 128,
            },
        );
        sink.record(Stage::Record, 99, &Error::invalid_base64("bad"));
        sink.push(Stage::End, 50, "trailing garbage, buf size = 60");

        assert_eq!(sink.len(), 3);
        let issues = sink.issues();
        assert_eq!(issues[0].stage, Stage::Name);
        assert_eq!(issues[0].offset, 14);
        assert_eq!(issues[1].stage, Stage::Base64);
        assert_eq!(issues[1].offset, 99);
        assert_eq!(issues[2].to_string(), "end at offset 50: trailing garbage, buf size = 60");
    }

    #[test]
    fn test_finish() {
        let sink = ErrorSink::new();
        let outcome = sink.finish(7u8);
        assert!(outcome.is_clean());
        assert_eq!(outcome.value, 7);
    }
}
