//! Authority record types (SOA).

use crate::error::Result;
use crate::name::NameDecoder;
use crate::wire::WireReader;
use serde::Serialize;
use std::fmt;

/// SOA record - Start of Authority (RFC 1035).
///
/// # Wire Format
///
/// ```text
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     MNAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     RNAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    SERIAL                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    REFRESH                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     RETRY                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    EXPIRE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    MINIMUM                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SOA {
    /// Primary name server for the zone.
    mname: String,
    /// Mailbox of the responsible person, `@` written as `.`.
    rname: String,
    /// Zone serial number.
    serial: u32,
    /// Refresh interval (seconds).
    refresh: u32,
    /// Retry interval (seconds).
    retry: u32,
    /// Expire time (seconds).
    expire: u32,
    /// Negative caching TTL (seconds).
    minimum: u32,
}

impl SOA {
    /// Creates a new SOA record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mname: impl Into<String>,
        rname: impl Into<String>,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    ) -> Self {
        Self {
            mname: mname.into(),
            rname: rname.into(),
            serial,
            refresh,
            retry,
            expire,
            minimum,
        }
    }

    /// Returns the primary name server.
    #[inline]
    pub fn mname(&self) -> &str {
        &self.mname
    }

    /// Returns the responsible mailbox.
    #[inline]
    pub fn rname(&self) -> &str {
        &self.rname
    }

    /// Returns the serial number.
    #[inline]
    pub const fn serial(&self) -> u32 {
        self.serial
    }

    /// Returns the refresh interval.
    #[inline]
    pub const fn refresh(&self) -> u32 {
        self.refresh
    }

    /// Returns the retry interval.
    #[inline]
    pub const fn retry(&self) -> u32 {
        self.retry
    }

    /// Returns the expire time.
    #[inline]
    pub const fn expire(&self) -> u32 {
        self.expire
    }

    /// Returns the minimum (negative caching) TTL.
    #[inline]
    pub const fn minimum(&self) -> u32 {
        self.minimum
    }

    /// Decodes an SOA record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let mname = NameDecoder::read(reader)?;
        let rname = NameDecoder::read(reader)?;

        Ok(Self {
            mname,
            rname,
            serial: reader.read_u32()?,
            refresh: reader.read_u32()?,
            retry: reader.read_u32()?,
            expire: reader.read_u32()?,
            minimum: reader.read_u32()?,
        })
    }
}

impl fmt::Display for SOA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname, self.rname, self.serial, self.refresh, self.retry, self.expire, self.minimum
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soa_rdata() -> Vec<u8> {
        let mut data = b"\x01a\x0croot-servers\x03net\x00".to_vec();
        data.extend_from_slice(b"\x05nstld\x0cverisign-grs\x03com\x00");
        for value in [2014050100u32, 1800, 900, 604800, 86400] {
            data.extend_from_slice(&value.to_be_bytes());
        }
        data
    }

    #[test]
    fn test_soa() {
        let data = soa_rdata();
        let soa = SOA::decode(&mut WireReader::new(&data)).unwrap();

        assert_eq!(soa.mname(), "a.root-servers.net.");
        assert_eq!(soa.rname(), "nstld.verisign-grs.com.");
        assert_eq!(soa.serial(), 2014050100);
        assert_eq!(soa.minimum(), 86400);
        assert_eq!(
            soa.to_string(),
            "a.root-servers.net. nstld.verisign-grs.com. 2014050100 1800 900 604800 86400"
        );
    }

    #[test]
    fn test_soa_truncated_counters() {
        let data = soa_rdata();
        let mut reader = WireReader::new(&data).with_limit(data.len() - 1);
        assert!(SOA::decode(&mut reader).is_err());
    }
}
