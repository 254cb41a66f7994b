//! DNS record classes.
//!
//! The class field identifies the protocol family of the resource record.
//! While multiple classes were envisioned, IN (Internet) is used almost
//! exclusively; CH shows up in `version.bind`-style server identity queries.

use crate::lookup::{Code, mnemonic_table};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// DNS record class.
///
/// See RFC 1035 Section 3.2.4 and RFC 6895.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum RecordClass {
    /// Reserved - RFC 6895
    RESERVED0 = 0,

    /// Internet - RFC 1035
    IN = 1,

    /// CHAOS - RFC 1035
    ///
    /// Also used by some servers for special queries like `version.bind`
    /// and `hostname.bind`.
    CH = 3,

    /// Hesiod - RFC 1035
    HS = 4,

    /// Query class NONE - RFC 2136
    NONE = 254,

    /// Query class ANY - RFC 1035
    ANY = 255,
}

mnemonic_table!(RecordClass: u16 {
    RESERVED0 => "RESERVED0",
    IN => "IN",
    CH => "CH",
    HS => "HS",
    NONE => "NONE",
    ANY => "ANY",
});

impl RecordClass {
    /// Returns true if this is a query-only class (NONE or ANY).
    #[inline]
    pub const fn is_query_class(self) -> bool {
        matches!(self, Self::NONE | Self::ANY)
    }
}

/// A class value as found on the wire, known or not.
pub type Class = Code<RecordClass>;

impl Class {
    /// Returns true if this is the Internet class.
    #[inline]
    pub fn is_internet(self) -> bool {
        self.is(RecordClass::IN)
    }
}

impl Default for Class {
    fn default() -> Self {
        Self::Known(RecordClass::IN)
    }
}
