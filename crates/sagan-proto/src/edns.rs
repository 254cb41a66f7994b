//! EDNS(0) support (RFC 6891).
//!
//! The OPT pseudo-RR reuses the resource record envelope: CLASS carries the
//! requestor's UDP payload size and TTL packs the extended RCODE, version
//! and flags. Its RDATA is a list of options.

use crate::error::{Error, Result};
use crate::name::escape;
use crate::rcode::Rcode;
use crate::wire::WireReader;
use data_encoding::HEXLOWER;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// Option code of the Name Server Identifier option (RFC 5001).
pub const OPTION_NSID: u16 = 3;

const DNSSEC_OK: u32 = 0x0000_8000;
const Z_MASK: u32 = 0x0000_7FFF;

/// A single EDNS option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EdnsOption {
    /// Option code.
    pub code: u16,
    /// Declared payload length.
    pub length: u16,
    /// Option name, when the code is one we name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// NSID payload as escaped text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsid: Option<String>,
    /// Payload, lowercase hex.
    pub data: String,
}

impl EdnsOption {
    /// Builds an option from its code and payload.
    pub fn new(code: u16, payload: &[u8]) -> Self {
        let is_nsid = code == OPTION_NSID;
        Self {
            code,
            length: u16::try_from(payload.len()).unwrap_or(u16::MAX),
            name: is_nsid.then(|| "NSID".to_string()),
            nsid: is_nsid.then(|| escape(payload)),
            data: HEXLOWER.encode(payload),
        }
    }

    /// Returns true if this is an NSID option.
    #[inline]
    pub fn is_nsid(&self) -> bool {
        self.code == OPTION_NSID
    }
}

impl fmt::Display for EdnsOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.nsid) {
            (Some(name), Some(nsid)) => write!(f, "{name}: \"{nsid}\""),
            _ => write!(f, "OPT{}: {}", self.code, self.data),
        }
    }
}

/// Decoded OPT pseudo-record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edns0 {
    /// Owner name, normally the root.
    pub name: String,
    /// Requestor's UDP payload size.
    pub udp_size: u16,
    /// Upper 8 bits of the extended RCODE.
    pub extended_rcode: u8,
    /// EDNS version.
    pub version: u8,
    /// DNSSEC OK flag.
    pub dnssec_ok: bool,
    /// Remaining flag bits (low 15 bits of the flags word).
    pub z: u16,
    /// Options in wire order.
    pub options: SmallVec<[EdnsOption; 2]>,
}

impl Edns0 {
    /// Decodes an OPT record from its envelope fields and RDATA window.
    ///
    /// `class` and `ttl` are the raw CLASS and TTL fields of the record.
    pub fn decode(name: String, class: u16, ttl: u32, reader: &mut WireReader<'_>) -> Result<Self> {
        let mut options = SmallVec::new();

        while !reader.is_empty() {
            let start = reader.position();
            if reader.remaining() < 4 {
                return Err(Error::invalid_rdata(
                    "OPT",
                    start,
                    format!("offset out of range: option header needs 4 bytes, {} left", reader.remaining()),
                ));
            }
            let code = reader.read_u16()?;
            let length = reader.read_u16()?;
            let payload = reader.read_bytes(usize::from(length)).map_err(|_| {
                Error::invalid_rdata(
                    "OPT",
                    start,
                    format!("option {code} length {length} exceeds remaining data"),
                )
            })?;
            options.push(EdnsOption::new(code, payload));
        }

        Ok(Self {
            name,
            udp_size: class,
            extended_rcode: (ttl >> 24) as u8,
            version: ((ttl >> 16) & 0xFF) as u8,
            dnssec_ok: ttl & DNSSEC_OK != 0,
            z: (ttl & Z_MASK) as u16,
            options,
        })
    }

    /// Returns the NSID option, if present.
    pub fn nsid(&self) -> Option<&EdnsOption> {
        self.options.iter().find(|option| option.is_nsid())
    }

    /// Combines the extended RCODE bits with the header's 4-bit RCODE.
    pub fn full_rcode(&self, header_rcode: Rcode) -> Rcode {
        Rcode::from_u16((u16::from(self.extended_rcode) << 4) | (header_rcode.to_u16() & 0x0F))
    }
}

impl fmt::Display for Edns0 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EDNS: version: {}, flags:", self.version)?;
        if self.dnssec_ok {
            f.write_str(" do")?;
        }
        write!(f, "; udp: {}", self.udp_size)?;
        for option in &self.options {
            write!(f, "\n; {option}")?;
        }
        Ok(())
    }
}
