//! Records whose RDATA is (mostly) a domain name: NS, CNAME, PTR, MX.
//!
//! The names may be compressed and point anywhere in the message, but they
//! have to end inside the RDATA window.

use crate::error::Result;
use crate::name::NameDecoder;
use crate::wire::WireReader;
use serde::Serialize;
use std::fmt;

/// NS record - authoritative name server (RFC 1035).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NS {
    /// The name server host.
    target: String,
}

impl NS {
    /// Creates a new NS record.
    #[inline]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Returns the name server host.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Decodes an NS record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self::new(NameDecoder::read(reader)?))
    }
}

impl fmt::Display for NS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target)
    }
}

/// CNAME record - canonical name (RFC 1035).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CNAME {
    /// The canonical name.
    target: String,
}

impl CNAME {
    /// Creates a new CNAME record.
    #[inline]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Returns the canonical name.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Decodes a CNAME record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self::new(NameDecoder::read(reader)?))
    }
}

impl fmt::Display for CNAME {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target)
    }
}

/// PTR record - domain name pointer (RFC 1035).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PTR {
    /// The pointed-to name.
    target: String,
}

impl PTR {
    /// Creates a new PTR record.
    #[inline]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Returns the pointed-to name.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Decodes a PTR record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self::new(NameDecoder::read(reader)?))
    }
}

impl fmt::Display for PTR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target)
    }
}

/// MX record - mail exchange (RFC 1035).
///
/// # Wire Format
///
/// ```text
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                  PREFERENCE                   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                   EXCHANGE                    /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MX {
    /// Preference value (lower is preferred).
    preference: u16,
    /// The mail exchanger host.
    mail_exchanger: String,
}

impl MX {
    /// Creates a new MX record.
    #[inline]
    pub fn new(preference: u16, mail_exchanger: impl Into<String>) -> Self {
        Self {
            preference,
            mail_exchanger: mail_exchanger.into(),
        }
    }

    /// Returns the preference value.
    #[inline]
    pub const fn preference(&self) -> u16 {
        self.preference
    }

    /// Returns the mail exchanger host.
    #[inline]
    pub fn mail_exchanger(&self) -> &str {
        &self.mail_exchanger
    }

    /// Decodes an MX record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let preference = reader.read_u16()?;
        let mail_exchanger = NameDecoder::read(reader)?;
        Ok(Self::new(preference, mail_exchanger))
    }
}

impl fmt::Display for MX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.mail_exchanger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ns_compressed_target() {
        // "example.com." at 0, then NS RDATA "ns1" + pointer to 0
        let mut data = b"\x07example\x03com\x00".to_vec();
        let start = data.len();
        data.extend_from_slice(b"\x03ns1\xC0\x00");

        let mut reader = WireReader::at(&data, start).with_limit(data.len());
        let ns = NS::decode(&mut reader).unwrap();
        assert_eq!(ns.target(), "ns1.example.com.");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_name_must_end_in_window() {
        let data = b"\x04host\x00";
        let mut reader = WireReader::new(data).with_limit(4);
        assert!(CNAME::decode(&mut reader).is_err());
    }

    #[test]
    fn test_mx() {
        let data = b"\x00\x0a\x04mail\x00";
        let mx = MX::decode(&mut WireReader::new(data)).unwrap();
        assert_eq!(mx.preference(), 10);
        assert_eq!(mx.mail_exchanger(), "mail.");
        assert_eq!(mx.to_string(), "10 mail.");

        assert!(MX::decode(&mut WireReader::new(&[0x00])).is_err());
    }

    #[test]
    fn test_ptr_display() {
        let data = b"\x01a\x00";
        assert_eq!(PTR::decode(&mut WireReader::new(data)).unwrap().to_string(), "a.");
    }
}
