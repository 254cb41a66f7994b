//! DNS record data (RDATA) types.
//!
//! One variant per layout the decoder understands, organised by category:
//!
//! - **Address records**: A, AAAA
//! - **Name records**: NS, CNAME, PTR, MX
//! - **Authority records**: SOA
//! - **Text records**: TXT, HINFO
//! - **Security records**: DS, DNSKEY, RRSIG, NSEC, NSEC3, NSEC3PARAM
//! - **Service records**: SRV
//! - **Certificate records**: SSHFP, TLSA
//!
//! Everything else is kept as an opaque hex dump.

pub mod address;
pub mod authority;
pub mod cert;
pub mod dnssec;
pub mod name;
pub mod service;
pub mod text;
pub mod unknown;

pub use address::{A, AAAA};
pub use authority::SOA;
pub use cert::{SSHFP, TLSA};
pub use dnssec::{DNSKEY, DS, NSEC, NSEC3, NSEC3PARAM, RRSIG, base32_to_extended_hex, decode_types_bitmap};
pub use name::{CNAME, MX, NS, PTR};
pub use service::SRV;
pub use text::{HINFO, TXT};
pub use unknown::{Legacy, Unknown};

use crate::error::{Error, Result};
use crate::rtype::{RecordType, Type};
use crate::wire::WireReader;
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

/// DNS record data.
///
/// Serializes as the bare field set of the inner record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum RData {
    // =========================================================================
    // Address Records
    // =========================================================================
    /// IPv4 address (A record)
    A(A),

    /// IPv6 address (AAAA record)
    AAAA(AAAA),

    // =========================================================================
    // Name Records
    // =========================================================================
    /// Name server (NS record)
    NS(NS),

    /// Canonical name (CNAME record)
    CNAME(CNAME),

    /// Pointer (PTR record)
    PTR(PTR),

    /// Mail exchange (MX record)
    MX(MX),

    // =========================================================================
    // Authority Records
    // =========================================================================
    /// Start of authority (SOA record)
    SOA(SOA),

    // =========================================================================
    // Text Records
    // =========================================================================
    /// Text (TXT record)
    TXT(TXT),

    /// Host information (HINFO record)
    HINFO(HINFO),

    // =========================================================================
    // DNSSEC Records
    // =========================================================================
    /// Delegation signer (DS record)
    DS(DS),

    /// DNS public key (DNSKEY record)
    DNSKEY(DNSKEY),

    /// DNSSEC signature (RRSIG record)
    RRSIG(RRSIG),

    /// Next secure (NSEC record)
    NSEC(NSEC),

    /// Next secure v3 (NSEC3 record)
    NSEC3(NSEC3),

    /// NSEC3 parameters (NSEC3PARAM record)
    NSEC3PARAM(NSEC3PARAM),

    // =========================================================================
    // Service and Certificate Records
    // =========================================================================
    /// Service location (SRV record)
    SRV(SRV),

    /// SSH key fingerprint (SSHFP record)
    SSHFP(SSHFP),

    /// TLSA certificate association
    TLSA(TLSA),

    // =========================================================================
    // Other
    // =========================================================================
    /// Answer data rebuilt from legacy result fields
    Legacy(Legacy),

    /// Unknown or unsupported record type (kept as hex)
    Unknown(Unknown),
}

impl RData {
    /// Decodes RDATA from a reader limited to the RDATA window.
    ///
    /// Dispatch uses the numeric type alone; the class is never consulted.
    /// A short read anywhere in the body is reported as an
    /// [`Error::InvalidRData`] at the start of the window.
    pub fn decode(rtype: Type, reader: &mut WireReader<'_>) -> Result<Self> {
        let start = reader.position();
        let size = reader.remaining();

        let Type::Known(known) = rtype else {
            return Ok(Self::Unknown(Unknown::decode(rtype.to_u16(), reader)));
        };

        let decoded = match known {
            RecordType::A => A::decode(reader).map(Self::A),
            RecordType::AAAA => AAAA::decode(reader).map(Self::AAAA),
            RecordType::NS => NS::decode(reader).map(Self::NS),
            RecordType::CNAME => CNAME::decode(reader).map(Self::CNAME),
            RecordType::PTR => PTR::decode(reader).map(Self::PTR),
            RecordType::MX => MX::decode(reader).map(Self::MX),
            RecordType::SOA => SOA::decode(reader).map(Self::SOA),
            RecordType::TXT => TXT::decode(reader).map(Self::TXT),
            RecordType::HINFO => HINFO::decode(reader).map(Self::HINFO),
            RecordType::DS => DS::decode(reader).map(Self::DS),
            RecordType::DNSKEY => DNSKEY::decode(reader).map(Self::DNSKEY),
            RecordType::RRSIG => RRSIG::decode(reader).map(Self::RRSIG),
            RecordType::NSEC => NSEC::decode(reader).map(Self::NSEC),
            RecordType::NSEC3 => NSEC3::decode(reader).map(Self::NSEC3),
            RecordType::NSEC3PARAM => NSEC3PARAM::decode(reader).map(Self::NSEC3PARAM),
            RecordType::SRV => SRV::decode(reader).map(Self::SRV),
            RecordType::SSHFP => SSHFP::decode(reader).map(Self::SSHFP),
            RecordType::TLSA => TLSA::decode(reader).map(Self::TLSA),
            _ => Ok(Self::Unknown(Unknown::decode(rtype.to_u16(), reader))),
        };

        decoded.map_err(|err| match err {
            Error::UnexpectedEof { .. } => Error::invalid_rdata(
                known.name(),
                start,
                format!("offset out of range: rdata size = {size}"),
            ),
            other => other,
        })
    }

    /// Returns the record type this data belongs to.
    ///
    /// Legacy data carries no type of its own.
    pub fn record_type(&self) -> Option<Type> {
        let known = match self {
            Self::A(_) => RecordType::A,
            Self::AAAA(_) => RecordType::AAAA,
            Self::NS(_) => RecordType::NS,
            Self::CNAME(_) => RecordType::CNAME,
            Self::PTR(_) => RecordType::PTR,
            Self::MX(_) => RecordType::MX,
            Self::SOA(_) => RecordType::SOA,
            Self::TXT(_) => RecordType::TXT,
            Self::HINFO(_) => RecordType::HINFO,
            Self::DS(_) => RecordType::DS,
            Self::DNSKEY(_) => RecordType::DNSKEY,
            Self::RRSIG(_) => RecordType::RRSIG,
            Self::NSEC(_) => RecordType::NSEC,
            Self::NSEC3(_) => RecordType::NSEC3,
            Self::NSEC3PARAM(_) => RecordType::NSEC3PARAM,
            Self::SRV(_) => RecordType::SRV,
            Self::SSHFP(_) => RecordType::SSHFP,
            Self::TLSA(_) => RecordType::TLSA,
            Self::Unknown(u) => return Some(Type::from_u16(u.type_code())),
            Self::Legacy(_) => return None,
        };
        Some(Type::Known(known))
    }

    /// Returns the IPv4 address if this is an A record.
    pub fn as_a(&self) -> Option<Ipv4Addr> {
        match self {
            Self::A(a) => Some(a.address()),
            _ => None,
        }
    }

    /// Returns the target name of an NS, CNAME, PTR or SRV record.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::NS(r) => Some(r.target()),
            Self::CNAME(r) => Some(r.target()),
            Self::PTR(r) => Some(r.target()),
            Self::SRV(r) => Some(r.target()),
            _ => None,
        }
    }

    /// Returns the SOA data if this is an SOA record.
    pub fn as_soa(&self) -> Option<&SOA> {
        match self {
            Self::SOA(soa) => Some(soa),
            _ => None,
        }
    }

    /// Returns the text segments if this is a TXT record.
    pub fn as_txt(&self) -> Option<&TXT> {
        match self {
            Self::TXT(txt) => Some(txt),
            _ => None,
        }
    }

    /// Returns the signature if this is an RRSIG record.
    pub fn as_rrsig(&self) -> Option<&RRSIG> {
        match self {
            Self::RRSIG(sig) => Some(sig),
            _ => None,
        }
    }

    /// Returns the opaque data if this is an unrecognised record.
    pub fn as_unknown(&self) -> Option<&Unknown> {
        match self {
            Self::Unknown(u) => Some(u),
            _ => None,
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(r) => write!(f, "{r}"),
            Self::AAAA(r) => write!(f, "{r}"),
            Self::NS(r) => write!(f, "{r}"),
            Self::CNAME(r) => write!(f, "{r}"),
            Self::PTR(r) => write!(f, "{r}"),
            Self::MX(r) => write!(f, "{r}"),
            Self::SOA(r) => write!(f, "{r}"),
            Self::TXT(r) => write!(f, "{r}"),
            Self::HINFO(r) => write!(f, "{r}"),
            Self::DS(r) => write!(f, "{r}"),
            Self::DNSKEY(r) => write!(f, "{r}"),
            Self::RRSIG(r) => write!(f, "{r}"),
            Self::NSEC(r) => write!(f, "{r}"),
            Self::NSEC3(r) => write!(f, "{r}"),
            Self::NSEC3PARAM(r) => write!(f, "{r}"),
            Self::SRV(r) => write!(f, "{r}"),
            Self::SSHFP(r) => write!(f, "{r}"),
            Self::TLSA(r) => write!(f, "{r}"),
            Self::Legacy(r) => write!(f, "{r}"),
            Self::Unknown(r) => write!(f, "{r}"),
        }
    }
}
