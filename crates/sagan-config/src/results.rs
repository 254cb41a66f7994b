//! Handling of measurement results.

use sagan_result::Action;
use serde::{Deserialize, Serialize};

/// How problems found in measurement results are handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    /// Reaction to errors the measurement reports.
    pub on_error: Action,

    /// Reaction to results that are not in the expected shape.
    pub on_malformation: Action,

    /// Decode `abuf`/`qbuf`. When false, messages are rebuilt from the
    /// legacy result fields.
    pub parse_buf: bool,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            on_error: Action::Warn,
            on_malformation: Action::Warn,
            parse_buf: true,
        }
    }
}

impl ResultsConfig {
    /// Fails on every problem.
    pub fn strict() -> Self {
        Self {
            on_error: Action::Fail,
            on_malformation: Action::Fail,
            ..Self::default()
        }
    }
}
