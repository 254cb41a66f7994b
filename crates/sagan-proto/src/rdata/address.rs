//! Address record types (A, AAAA).

use crate::error::{Error, Result};
use crate::wire::WireReader;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;

/// A record - IPv4 address (RFC 1035).
///
/// # Wire Format
///
/// The RDATA is exactly 4 bytes containing the IPv4 address in network byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct A {
    /// The IPv4 address.
    address: Ipv4Addr,
}

impl A {
    /// Creates a new A record.
    #[inline]
    pub const fn new(address: Ipv4Addr) -> Self {
        Self { address }
    }

    /// Returns the IPv4 address.
    #[inline]
    pub const fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Decodes an A record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let start = reader.position();
        if reader.remaining() != 4 {
            return Err(Error::invalid_rdata(
                "A",
                start,
                format!("rdata size = {}, expected 4", reader.remaining()),
            ));
        }
        let octets = reader.read_bytes(4)?;
        Ok(Self::new(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3])))
    }
}

impl From<Ipv4Addr> for A {
    fn from(address: Ipv4Addr) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// AAAA record - IPv6 address (RFC 3596).
///
/// The address is kept as the eight 16-bit groups of the wire form and
/// printed as lowercase hex joined by `:`, without `::` compression, so
/// `2001:41d0:1:4874:0:0:0:1` comes out exactly as the probes reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AAAA {
    /// The eight address groups.
    groups: [u16; 8],
}

impl AAAA {
    /// Creates a new AAAA record from its groups.
    #[inline]
    pub const fn new(groups: [u16; 8]) -> Self {
        Self { groups }
    }

    /// Returns the address groups.
    #[inline]
    pub const fn groups(&self) -> [u16; 8] {
        self.groups
    }

    /// Returns the address as a standard library value.
    #[inline]
    pub fn address(&self) -> std::net::Ipv6Addr {
        let [a, b, c, d, e, f, g, h] = self.groups;
        std::net::Ipv6Addr::new(a, b, c, d, e, f, g, h)
    }

    /// Decodes an AAAA record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let start = reader.position();
        if reader.remaining() != 16 {
            return Err(Error::invalid_rdata(
                "AAAA",
                start,
                format!("rdata size = {}, expected 16", reader.remaining()),
            ));
        }
        let mut groups = [0u16; 8];
        for group in &mut groups {
            *group = reader.read_u16()?;
        }
        Ok(Self::new(groups))
    }
}

impl fmt::Display for AAAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{group:x}")?;
        }
        Ok(())
    }
}

impl Serialize for AAAA {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_record() {
        let data = [194, 150, 168, 100];
        let a = A::decode(&mut WireReader::new(&data)).unwrap();
        assert_eq!(a.to_string(), "194.150.168.100");
        assert_eq!(a.address(), Ipv4Addr::new(194, 150, 168, 100));
    }

    #[test]
    fn test_a_wrong_length() {
        assert!(A::decode(&mut WireReader::new(&[1, 2, 3])).is_err());
        assert!(A::decode(&mut WireReader::new(&[1, 2, 3, 4, 5])).is_err());
    }

    #[test]
    fn test_aaaa_uncompressed_text() {
        let data = [
            0x20, 0x01, 0x41, 0xd0, 0x00, 0x01, 0x48, 0x74, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        ];
        let aaaa = AAAA::decode(&mut WireReader::new(&data)).unwrap();
        assert_eq!(aaaa.to_string(), "2001:41d0:1:4874:0:0:0:1");
        assert_eq!(aaaa.address().to_string(), "2001:41d0:1:4874::1");
        assert_eq!(serde_json::to_string(&aaaa).unwrap(), "\"2001:41d0:1:4874:0:0:0:1\"");
    }

    #[test]
    fn test_aaaa_short() {
        assert!(AAAA::decode(&mut WireReader::new(&[0u8; 15])).is_err());
    }
}
