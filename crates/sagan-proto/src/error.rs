//! DNS buffer decoding error types.
//!
//! Every decode step returns [`Result`]. The message decoder turns these
//! errors into [`DecodeIssue`](crate::issue::DecodeIssue) entries instead of
//! propagating them, so only caller misuse (a string that is not base64)
//! ever reaches the caller as an `Err`.

use crate::issue::Stage;
use thiserror::Error;

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// DNS decoding errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// The buffer string is not valid base64.
    #[error("invalid base64 buffer: {message}")]
    InvalidBase64 {
        /// Description from the base64 decoder.
        message: String,
    },

    // =========================================================================
    // Wire Format Errors
    // =========================================================================
    /// Buffer is too short to contain the expected data.
    #[error("offset out of range: expected at least {expected} bytes, buf size = {actual}")]
    BufferTooShort {
        /// Expected minimum size.
        expected: usize,
        /// Actual buffer size.
        actual: usize,
    },

    /// Unexpected end of data while reading.
    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEof {
        /// Byte offset where the read would have ended.
        offset: usize,
    },

    /// Invalid data encountered while decoding.
    #[error("invalid data at offset {offset}: {message}")]
    InvalidData {
        /// Byte offset of the invalid data.
        offset: usize,
        /// Description of the error.
        message: String,
    },

    // =========================================================================
    // Domain Name Errors
    // =========================================================================
    /// Label length byte in the reserved 0x40-0xBF range.
    #[error("bad label length 0x{length:02x} at offset {offset}")]
    BadLabelLength {
        /// Offset of the length byte.
        offset: usize,
        /// The length byte.
        length: u8,
    },

    /// Compression pointer points outside the buffer.
    #[error("bad pointer at offset {offset}: target {target} is out of range")]
    PointerOutOfRange {
        /// Offset of the pointer.
        offset: usize,
        /// Target offset the pointer references.
        target: usize,
    },

    /// Too many compression pointer jumps while decoding one name.
    #[error("pointer loop at offset {offset}: more than {max_jumps} jumps")]
    PointerLoop {
        /// Offset of the pointer that exceeded the limit.
        offset: usize,
        /// Maximum allowed jumps.
        max_jumps: usize,
    },

    // =========================================================================
    // RDATA Errors
    // =========================================================================
    /// Invalid RDATA content.
    #[error("invalid RDATA for {rtype} at offset {offset}: {message}")]
    InvalidRData {
        /// Record type mnemonic.
        rtype: String,
        /// Offset of the RDATA.
        offset: usize,
        /// Error description.
        message: String,
    },

    /// Malformed NSEC/NSEC3 type bitmap.
    #[error("bad types bitmap at offset {offset}: {message}")]
    TypesBitmap {
        /// Offset within the bitmap.
        offset: usize,
        /// Error description.
        message: String,
    },
}

impl Error {
    /// Creates a new `BufferTooShort` error.
    #[inline]
    pub fn buffer_too_short(expected: usize, actual: usize) -> Self {
        Self::BufferTooShort { expected, actual }
    }

    /// Creates a new `UnexpectedEof` error.
    #[inline]
    pub fn unexpected_eof(offset: usize) -> Self {
        Self::UnexpectedEof { offset }
    }

    /// Creates a new `InvalidData` error.
    #[inline]
    pub fn invalid_data(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidData {
            offset,
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRData` error.
    #[inline]
    pub fn invalid_rdata(rtype: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidRData {
            rtype: rtype.into(),
            offset,
            message: message.into(),
        }
    }

    /// Creates a new `TypesBitmap` error.
    #[inline]
    pub fn types_bitmap(offset: usize, message: impl Into<String>) -> Self {
        Self::TypesBitmap {
            offset,
            message: message.into(),
        }
    }

    /// Creates a new `InvalidBase64` error.
    #[inline]
    pub fn invalid_base64(message: impl Into<String>) -> Self {
        Self::InvalidBase64 {
            message: message.into(),
        }
    }

    /// Returns the byte offset the error refers to, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::InvalidBase64 { .. } => None,
            Self::BufferTooShort { actual, .. } => Some(*actual),
            Self::UnexpectedEof { offset }
            | Self::InvalidData { offset, .. }
            | Self::BadLabelLength { offset, .. }
            | Self::PointerOutOfRange { offset, .. }
            | Self::PointerLoop { offset, .. }
            | Self::InvalidRData { offset, .. }
            | Self::TypesBitmap { offset, .. } => Some(*offset),
        }
    }

    /// Returns the decode stage this error belongs to, falling back to
    /// `default` for errors that are not tied to one.
    pub fn stage_or(&self, default: Stage) -> Stage {
        match self {
            Self::BadLabelLength { .. } | Self::PointerOutOfRange { .. } | Self::PointerLoop { .. } => {
                Stage::Name
            }
            Self::TypesBitmap { .. } => Stage::TypesBitmap,
            Self::InvalidBase64 { .. } => Stage::Base64,
            _ => default,
        }
    }

    /// Returns true if this error describes a structurally broken buffer.
    ///
    /// Only [`Error::InvalidBase64`] is not: it means the caller handed over
    /// something that was never a buffer.
    #[inline]
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::InvalidBase64 { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::buffer_too_short(12, 8);
        assert_eq!(
            err.to_string(),
            "offset out of range: expected at least 12 bytes, buf size = 8"
        );

        let err = Error::BadLabelLength {
            offset: 17,
            length: 0x41,
        };
        assert_eq!(err.to_string(), "bad label length 0x41 at offset 17");
    }

    #[test]
    fn test_error_stage() {
        let loop_err = Error::PointerLoop {
            offset: 12,
            max_jumps: 128,
        };
        assert_eq!(loop_err.stage_or(Stage::Record), Stage::Name);
        assert_eq!(
            Error::types_bitmap(3, "truncated").stage_or(Stage::Record),
            Stage::TypesBitmap
        );
        assert_eq!(Error::unexpected_eof(40).stage_or(Stage::Question), Stage::Question);
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::unexpected_eof(3).is_malformed());
        assert!(Error::invalid_rdata("A", 30, "too short").is_malformed());
        assert!(!Error::invalid_base64("bad symbol").is_malformed());
        assert_eq!(Error::invalid_base64("x").offset(), None);
        assert_eq!(Error::unexpected_eof(9).offset(), Some(9));
    }
}
