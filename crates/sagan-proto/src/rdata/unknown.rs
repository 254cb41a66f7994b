//! Opaque record data: unrecognised types and backfilled legacy answers.

use crate::wire::WireReader;
use data_encoding::HEXLOWER;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// Unknown record type - raw RDATA kept as hex.
///
/// Rendered in the RFC 3597 generic form `\# <length> <hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Unknown {
    /// The record type code.
    #[serde(skip)]
    type_code: u16,
    /// The raw RDATA, lowercase hex.
    rdata: String,
}

impl Unknown {
    /// Creates a new unknown record from raw RDATA bytes.
    pub fn new(type_code: u16, data: &[u8]) -> Self {
        Self {
            type_code,
            rdata: HEXLOWER.encode(data),
        }
    }

    /// Takes the rest of the reader's window as opaque RDATA.
    pub fn decode(type_code: u16, reader: &mut WireReader<'_>) -> Self {
        Self::new(type_code, reader.read_rest())
    }

    /// Returns the record type code.
    #[inline]
    pub const fn type_code(&self) -> u16 {
        self.type_code
    }

    /// Returns the RDATA as hex.
    #[inline]
    pub fn rdata(&self) -> &str {
        &self.rdata
    }

    /// Returns the RDATA length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.rdata.len() / 2
    }

    /// Returns true if the RDATA is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rdata.is_empty()
    }
}

impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\# {}", self.len())?;
        if !self.is_empty() {
            write!(f, " {}", self.rdata)?;
        }
        Ok(())
    }
}

/// Answer data rebuilt from the flat fields of an old result format.
///
/// Such results carry no wire data, only whatever the probe firmware chose
/// to print: free-form `RDATA` text and, for SOA answers, the primary name
/// server, mailbox and serial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Legacy {
    /// Free-form RDATA text, one entry per string.
    #[serde(skip_serializing_if = "SmallVec::is_empty")]
    data: SmallVec<[String; 1]>,
    /// SOA primary name server.
    #[serde(skip_serializing_if = "Option::is_none")]
    mname: Option<String>,
    /// SOA responsible mailbox.
    #[serde(skip_serializing_if = "Option::is_none")]
    rname: Option<String>,
    /// SOA serial number.
    #[serde(skip_serializing_if = "Option::is_none")]
    serial: Option<u32>,
}

impl Legacy {
    /// Creates legacy data from RDATA strings.
    pub fn new(data: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            data: data.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the SOA fields.
    #[must_use]
    pub fn with_soa(mut self, mname: Option<String>, rname: Option<String>, serial: Option<u32>) -> Self {
        self.mname = mname;
        self.rname = rname;
        self.serial = serial;
        self
    }

    /// Returns the RDATA strings.
    pub fn data(&self) -> &[String] {
        &self.data
    }

    /// Returns the SOA primary name server, if present.
    pub fn mname(&self) -> Option<&str> {
        self.mname.as_deref()
    }

    /// Returns the SOA mailbox, if present.
    pub fn rname(&self) -> Option<&str> {
        self.rname.as_deref()
    }

    /// Returns the SOA serial, if present.
    pub const fn serial(&self) -> Option<u32> {
        self.serial
    }

    /// Returns true if nothing was carried over.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.mname.is_none() && self.rname.is_none() && self.serial.is_none()
    }
}

impl fmt::Display for Legacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        parts.extend(self.mname.clone());
        parts.extend(self.rname.clone());
        parts.extend(self.serial.map(|serial| serial.to_string()));
        parts.extend(self.data.iter().cloned());
        f.write_str(&parts.join(" "))
    }
}
