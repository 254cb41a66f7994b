//! DNS message header.
//!
//! The DNS header is a fixed 12-byte structure at the start of every DNS message.
//! It contains control information and counts of the sections that follow.

use crate::error::{Error, Result};
use crate::opcode::Opcode;
use crate::rcode::Rcode;
use crate::wire::WireReader;
use bitflags::bitflags;
use serde::Serialize;
use std::fmt;

/// Size of the DNS header in bytes.
pub const HEADER_SIZE: usize = 12;

const OPCODE_MASK: u16 = 0x7800;
const OPCODE_SHIFT: u16 = 11;
const RCODE_MASK: u16 = 0x000F;

bitflags! {
    /// DNS header flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct HeaderFlags: u16 {
        /// Query/Response flag: 0 = query, 1 = response
        const QR = 0x8000;

        /// Authoritative Answer: server is authoritative for the domain
        const AA = 0x0400;

        /// Truncation: message was truncated
        const TC = 0x0200;

        /// Recursion Desired: client wants recursive resolution
        const RD = 0x0100;

        /// Recursion Available: server supports recursion
        const RA = 0x0080;

        /// Reserved for future use (must be zero)
        const Z = 0x0040;

        /// Authentic Data: response data is authenticated (DNSSEC)
        const AD = 0x0020;

        /// Checking Disabled: disable DNSSEC validation
        const CD = 0x0010;
    }
}

impl Default for HeaderFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// DNS message header.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    QDCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ANCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    NSCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ARCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// The counts are what the wire declared. A buffer that fails to decode part
/// way through leaves the section lists shorter than these counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Header {
    /// Transaction identifier.
    pub id: u16,

    /// Single-bit flags.
    pub flags: HeaderFlags,

    /// The reserved Z bit as a number (0 or 1).
    pub z: u8,

    /// Operation code.
    pub opcode: Opcode,

    /// Response code (4-bit header part).
    pub rcode: Rcode,

    /// Number of questions.
    pub qdcount: u16,

    /// Number of answer records.
    pub ancount: u16,

    /// Number of authority records.
    pub nscount: u16,

    /// Number of additional records.
    pub arcount: u16,
}

impl Header {
    /// Decodes a header from the start of a buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::buffer_too_short(HEADER_SIZE, data.len()));
        }
        Self::read(&mut WireReader::new(data))
    }

    /// Decodes a header at the reader's position.
    pub fn read(reader: &mut WireReader<'_>) -> Result<Self> {
        let id = reader.read_u16()?;
        let bits = reader.read_u16()?;
        let qdcount = reader.read_u16()?;
        let ancount = reader.read_u16()?;
        let nscount = reader.read_u16()?;
        let arcount = reader.read_u16()?;

        let flags = HeaderFlags::from_bits_truncate(bits);

        Ok(Self {
            id,
            flags,
            z: u8::from(flags.contains(HeaderFlags::Z)),
            opcode: Opcode::from_u16((bits & OPCODE_MASK) >> OPCODE_SHIFT),
            rcode: Rcode::from_u16(bits & RCODE_MASK),
            qdcount,
            ancount,
            nscount,
            arcount,
        })
    }

    /// Builds a header from counts alone, with every flag clear.
    ///
    /// Used when a message is reconstructed from legacy result fields that
    /// never carried the flags word.
    pub fn from_counts(id: u16, qdcount: u16, ancount: u16, nscount: u16, arcount: u16) -> Self {
        Self {
            id,
            qdcount,
            ancount,
            nscount,
            arcount,
            ..Self::default()
        }
    }

    /// Returns true if this is a query.
    #[inline]
    pub fn is_query(&self) -> bool {
        !self.flags.contains(HeaderFlags::QR)
    }

    /// Returns true if this is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.flags.contains(HeaderFlags::QR)
    }

    /// Returns true if the response is from an authoritative server.
    #[inline]
    pub fn is_authoritative(&self) -> bool {
        self.flags.contains(HeaderFlags::AA)
    }

    /// Returns true if the message was truncated.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.flags.contains(HeaderFlags::TC)
    }

    /// Returns true if recursion was requested.
    #[inline]
    pub fn recursion_desired(&self) -> bool {
        self.flags.contains(HeaderFlags::RD)
    }

    /// Returns true if recursion is available.
    #[inline]
    pub fn recursion_available(&self) -> bool {
        self.flags.contains(HeaderFlags::RA)
    }

    /// Returns true if the response data is authenticated (DNSSEC).
    #[inline]
    pub fn authenticated_data(&self) -> bool {
        self.flags.contains(HeaderFlags::AD)
    }

    /// Returns true if DNSSEC checking is disabled.
    #[inline]
    pub fn checking_disabled(&self) -> bool {
        self.flags.contains(HeaderFlags::CD)
    }

    /// Returns the declared record count across answer, authority and additional.
    #[inline]
    pub fn total_record_count(&self) -> usize {
        usize::from(self.ancount) + usize::from(self.nscount) + usize::from(self.arcount)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "opcode: {}, status: {}, id: {}\nflags:",
            self.opcode, self.rcode, self.id
        )?;

        for (flag, text) in [
            (HeaderFlags::QR, "qr"),
            (HeaderFlags::AA, "aa"),
            (HeaderFlags::TC, "tc"),
            (HeaderFlags::RD, "rd"),
            (HeaderFlags::RA, "ra"),
            (HeaderFlags::AD, "ad"),
            (HeaderFlags::CD, "cd"),
        ] {
            if self.flags.contains(flag) {
                write!(f, " {text}")?;
            }
        }

        write!(
            f,
            "; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
            self.qdcount, self.ancount, self.nscount, self.arcount
        )
    }
}
