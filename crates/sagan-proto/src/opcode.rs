//! DNS operation codes (OpCodes).
//!
//! OpCodes specify the kind of query in a DNS message header.
//! Defined in RFC 1035 Section 4.1.1 with extensions from subsequent RFCs.

use crate::lookup::{Code, mnemonic_table};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// DNS operation code.
///
/// Values 3 and 6-15 are not in the table and surface as
/// [`Code::Unknown`] through [`Opcode`].
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
#[repr(u8)]
pub enum OpCode {
    /// Standard query (QUERY) - RFC 1035
    Query = 0,

    /// Inverse query (IQUERY) - RFC 1035, obsoleted by RFC 3425
    IQuery = 1,

    /// Server status request (STATUS) - RFC 1035
    Status = 2,

    /// Notify - RFC 1996
    ///
    /// Sent by primary servers to tell secondaries that zone data changed.
    Notify = 4,

    /// Dynamic update - RFC 2136
    Update = 5,
}

mnemonic_table!(OpCode: u8 {
    Query => "QUERY",
    IQuery => "IQUERY",
    Status => "STATUS",
    Notify => "NOTIFY",
    Update => "UPDATE",
});

impl OpCode {
    /// Creates an opcode from its numeric value.
    ///
    /// Returns `None` for reserved or unassigned values.
    #[inline]
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from(value).ok()
    }
}

impl Default for OpCode {
    fn default() -> Self {
        Self::Query
    }
}

/// An opcode as found on the wire, known or not.
pub type Opcode = Code<OpCode>;

impl Default for Opcode {
    fn default() -> Self {
        Self::Known(OpCode::Query)
    }
}
