//! Section toggles for message decoding.

use serde::{Deserialize, Serialize};

/// Which parts of a message to keep.
///
/// A disabled section is still walked on the wire so that later sections
/// start at the right offset; its entries are simply not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Keep the header.
    pub header: bool,
    /// Keep the question section.
    pub questions: bool,
    /// Keep the answer section.
    pub answers: bool,
    /// Keep the authority section.
    pub authorities: bool,
    /// Keep the additional section.
    pub additionals: bool,
    /// Divert OPT records into `edns0`.
    ///
    /// When false, OPT records stay in the additional section in their
    /// opaque form.
    pub edns0: bool,
}

impl DecodeOptions {
    /// Every section enabled.
    pub const ALL: Self = Self {
        header: true,
        questions: true,
        answers: true,
        authorities: true,
        additionals: true,
        edns0: true,
    };

    /// Only the header, for callers that want flags and counts.
    pub const HEADER_ONLY: Self = Self {
        header: true,
        questions: false,
        answers: false,
        authorities: false,
        additionals: false,
        edns0: false,
    };
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::ALL
    }
}
