//! Result layer errors.

use thiserror::Error;

/// Errors raised while reading a measurement result.
///
/// `Error` and `Malformed` only appear when the matching [`Action`] is
/// [`Action::Fail`]; with the other actions the problem is flagged on the
/// result instead.
///
/// [`Action`]: crate::Action
/// [`Action::Fail`]: crate::Action::Fail
#[derive(Error, Debug)]
pub enum ResultError {
    #[error("The JSON result could not be parsed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("This doesn't look like a RIPE Atlas measurement: {0}")]
    NotAMeasurement(String),

    #[error("Expected a dns result, found type {0:?}")]
    WrongType(String),

    #[error("{0}")]
    Error(String),

    #[error("{0}")]
    Malformed(String),

    #[error("Unable to decode buffer: {0}")]
    Decode(#[from] sagan_proto::Error),
}

/// Result type for the result layer.
pub type Result<T> = std::result::Result<T, ResultError>;

impl ResultError {
    /// Returns true if the error came from the measurement itself rather
    /// than from the shape of the input.
    #[inline]
    pub fn is_measurement_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
