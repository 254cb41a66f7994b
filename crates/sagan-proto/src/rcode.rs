//! DNS response codes (RCODEs).
//!
//! Response codes indicate the status of a DNS operation.
//! Defined in RFC 1035 Section 4.1.1 with extensions from subsequent RFCs.
//! Only the 4-bit header value is decoded here; the EDNS0 extended bits are
//! reported separately on [`Edns0`](crate::edns::Edns0).

use crate::lookup::{Code, mnemonic_table};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// DNS response code.
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
pub enum ResponseCode {
    /// No error condition - RFC 1035
    NoError = 0,

    /// Format error - RFC 1035
    ///
    /// The name server was unable to interpret the query.
    FormErr = 1,

    /// Server failure - RFC 1035
    ServFail = 2,

    /// Name error - RFC 1035
    ///
    /// The domain name referenced in the query does not exist.
    NXDomain = 3,

    /// Not implemented - RFC 1035
    NotImp = 4,

    /// Query refused - RFC 1035
    Refused = 5,

    /// Name exists when it should not - RFC 2136
    YXDomain = 6,

    /// RR set exists when it should not - RFC 2136
    YXRRSet = 7,

    /// RR set that should exist does not - RFC 2136
    NXRRSet = 8,

    /// Server not authoritative for zone - RFC 2136
    NotAuth = 9,

    /// Name not contained in zone - RFC 2136
    NotZone = 10,

    /// Bad OPT version - RFC 6891
    BadVers = 16,
}

mnemonic_table!(ResponseCode: u16 {
    NoError => "NOERROR",
    FormErr => "FORMERR",
    ServFail => "SERVFAIL",
    NXDomain => "NXDOMAIN",
    NotImp => "NOTIMP",
    Refused => "REFUSED",
    YXDomain => "YXDOMAIN",
    YXRRSet => "YXRRSET",
    NXRRSet => "NXRRSET",
    NotAuth => "NOTAUTH",
    NotZone => "NOTZONE",
    BadVers => "BADVERS",
});

impl ResponseCode {
    /// Returns true if this indicates success.
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::NoError)
    }
}

/// A response code as found on the wire, known or not.
pub type Rcode = Code<ResponseCode>;

impl Rcode {
    /// Returns true for anything other than NOERROR.
    #[inline]
    pub fn is_error(self) -> bool {
        !self.is(ResponseCode::NoError)
    }
}

impl Default for Rcode {
    fn default() -> Self {
        Self::Known(ResponseCode::NoError)
    }
}
