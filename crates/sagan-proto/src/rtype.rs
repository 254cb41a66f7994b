//! DNS record types.
//!
//! The full mnemonic table used when rendering decoded buffers: the RFC 1035
//! base types, the DNSSEC types, and the assorted historic and query-only
//! codes that still turn up in captured traffic.

use crate::lookup::{Code, mnemonic_table};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// DNS record type.
///
/// See RFC 1035, RFC 3596, RFC 4034, RFC 5155 and the IANA registry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum RecordType {
    // =========================================================================
    // Standard Record Types (RFC 1035 and RFC 1183)
    // =========================================================================
    /// No type (reserved)
    NONE = 0,

    /// IPv4 address - RFC 1035
    A = 1,

    /// Authoritative name server - RFC 1035
    NS = 2,

    /// Mail destination (obsolete) - RFC 1035
    MD = 3,

    /// Mail forwarder (obsolete) - RFC 1035
    MF = 4,

    /// Canonical name - RFC 1035
    CNAME = 5,

    /// Start of authority - RFC 1035
    SOA = 6,

    /// Mailbox domain name - RFC 1035
    MB = 7,

    /// Mail group member - RFC 1035
    MG = 8,

    /// Mail rename domain name - RFC 1035
    MR = 9,

    /// Null record - RFC 1035
    NULL = 10,

    /// Well known service - RFC 1035
    WKS = 11,

    /// Domain name pointer - RFC 1035
    PTR = 12,

    /// Host information - RFC 1035
    HINFO = 13,

    /// Mailbox information - RFC 1035
    MINFO = 14,

    /// Mail exchange - RFC 1035
    MX = 15,

    /// Text strings - RFC 1035
    TXT = 16,

    /// Responsible person - RFC 1183
    RP = 17,

    /// AFS database location - RFC 1183
    AFSDB = 18,

    /// X.25 PSDN address - RFC 1183
    X25 = 19,

    /// ISDN address - RFC 1183
    ISDN = 20,

    /// Route through - RFC 1183
    RT = 21,

    // =========================================================================
    // Legacy and Miscellaneous Types
    // =========================================================================
    /// NSAP address - RFC 1706
    NSAP = 22,

    /// NSAP pointer - RFC 1706
    #[allow(non_camel_case_types)]
    NSAP_PTR = 23,

    /// Signature (obsolete) - RFC 2535
    SIG = 24,

    /// Key (obsolete) - RFC 2535
    KEY = 25,

    /// X.400 mail mapping - RFC 2163
    PX = 26,

    /// Geographical position - RFC 1712
    GPOS = 27,

    /// IPv6 address - RFC 3596
    AAAA = 28,

    /// Location - RFC 1876
    LOC = 29,

    /// Next domain (obsolete) - RFC 2535
    NXT = 30,

    /// Service locator - RFC 2782
    SRV = 33,

    /// Naming authority pointer - RFC 3403
    NAPTR = 35,

    /// Key exchanger - RFC 2230
    KX = 36,

    /// Certificate - RFC 4398
    CERT = 37,

    /// IPv6 address (historic) - RFC 6563
    A6 = 38,

    /// Delegation name - RFC 6672
    DNAME = 39,

    /// EDNS0 option pseudo-record - RFC 6891
    OPT = 41,

    /// Address prefix list - RFC 3123
    APL = 42,

    // =========================================================================
    // DNSSEC Record Types
    // =========================================================================
    /// Delegation signer - RFC 4034
    DS = 43,

    /// SSH key fingerprint - RFC 4255
    SSHFP = 44,

    /// IPsec key - RFC 4025
    IPSECKEY = 45,

    /// DNSSEC signature - RFC 4034
    RRSIG = 46,

    /// Next secure - RFC 4034
    NSEC = 47,

    /// DNS key - RFC 4034
    DNSKEY = 48,

    /// DHCP identifier - RFC 4701
    DHCID = 49,

    /// Next secure v3 - RFC 5155
    NSEC3 = 50,

    /// NSEC3 parameters - RFC 5155
    NSEC3PARAM = 51,

    // =========================================================================
    // Other Assigned Types
    // =========================================================================
    /// TLSA certificate association - RFC 6698
    TLSA = 52,

    /// Host identity protocol - RFC 8005
    HIP = 55,

    /// Sender policy framework (obsolete) - RFC 7208
    SPF = 99,

    /// Unspecified (reserved)
    UNSPEC = 103,

    // =========================================================================
    // Query-Only Types
    // =========================================================================
    /// Transaction key - RFC 2930
    TKEY = 249,

    /// Transaction signature - RFC 8945
    TSIG = 250,

    /// Incremental zone transfer - RFC 1995
    IXFR = 251,

    /// Full zone transfer - RFC 5936
    AXFR = 252,

    /// Mailbox-related records - RFC 1035
    MAILB = 253,

    /// Mail agent records (obsolete) - RFC 1035
    MAILA = 254,

    /// All records - RFC 1035
    ANY = 255,

    // =========================================================================
    // Private Use Range
    // =========================================================================
    /// DNSSEC trust authority
    TA = 32768,

    /// DNSSEC lookaside validation (historic) - RFC 8749
    DLV = 32769,
}

mnemonic_table!(RecordType: u16 {
    NONE => "NONE",
    A => "A",
    NS => "NS",
    MD => "MD",
    MF => "MF",
    CNAME => "CNAME",
    SOA => "SOA",
    MB => "MB",
    MG => "MG",
    MR => "MR",
    NULL => "NULL",
    WKS => "WKS",
    PTR => "PTR",
    HINFO => "HINFO",
    MINFO => "MINFO",
    MX => "MX",
    TXT => "TXT",
    RP => "RP",
    AFSDB => "AFSDB",
    X25 => "X25",
    ISDN => "ISDN",
    RT => "RT",
    NSAP => "NSAP",
    NSAP_PTR => "NSAP_PTR",
    SIG => "SIG",
    KEY => "KEY",
    PX => "PX",
    GPOS => "GPOS",
    AAAA => "AAAA",
    LOC => "LOC",
    NXT => "NXT",
    SRV => "SRV",
    NAPTR => "NAPTR",
    KX => "KX",
    CERT => "CERT",
    A6 => "A6",
    DNAME => "DNAME",
    OPT => "OPT",
    APL => "APL",
    DS => "DS",
    SSHFP => "SSHFP",
    IPSECKEY => "IPSECKEY",
    RRSIG => "RRSIG",
    NSEC => "NSEC",
    DNSKEY => "DNSKEY",
    DHCID => "DHCID",
    NSEC3 => "NSEC3",
    NSEC3PARAM => "NSEC3PARAM",
    TLSA => "TLSA",
    HIP => "HIP",
    SPF => "SPF",
    UNSPEC => "UNSPEC",
    TKEY => "TKEY",
    TSIG => "TSIG",
    IXFR => "IXFR",
    AXFR => "AXFR",
    MAILB => "MAILB",
    MAILA => "MAILA",
    ANY => "ANY",
    TA => "TA",
    DLV => "DLV",
});

impl RecordType {
    /// Returns true if this is a DNSSEC-related type.
    #[inline]
    pub const fn is_dnssec(self) -> bool {
        matches!(
            self,
            Self::DS | Self::RRSIG | Self::NSEC | Self::DNSKEY | Self::NSEC3 | Self::NSEC3PARAM | Self::DLV
        )
    }

    /// Returns true if this is a pseudo-record type (not stored in zones).
    #[inline]
    pub const fn is_pseudo_record(self) -> bool {
        matches!(self, Self::OPT | Self::TKEY | Self::TSIG)
    }
}

/// A record type as found on the wire, known or not.
pub type Type = Code<RecordType>;

impl Default for Type {
    fn default() -> Self {
        Self::Known(RecordType::A)
    }
}
