//! Text-based record types (TXT, HINFO).
//!
//! Character-strings are escaped the same way as name labels, so anything
//! outside printable ASCII shows up as `\DDD`.

use crate::error::{Error, Result};
use crate::name::escape;
use crate::wire::WireReader;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// TXT record - Text (RFC 1035).
///
/// A sequence of `<length><bytes>` character-strings filling the RDATA.
/// Most records carry one or two, hence the inline capacity. Serializes as
/// `data` (the segment list) and `data_string` (the segments joined).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TXT {
    /// The escaped text segments, in wire order.
    segments: SmallVec<[String; 2]>,
}

impl TXT {
    /// Creates a new TXT record from already escaped segments.
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the segments.
    pub fn data(&self) -> &[String] {
        &self.segments
    }

    /// Returns the segments joined by single spaces.
    pub fn data_string(&self) -> String {
        self.segments.join(" ")
    }

    /// Decodes a TXT record from an RDATA window.
    ///
    /// An empty RDATA yields a record with no segments.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let mut segments = SmallVec::new();

        while !reader.is_empty() {
            let start = reader.position();
            let len = reader.read_u8()?;
            let bytes = reader.read_bytes(usize::from(len)).map_err(|_| {
                Error::invalid_rdata(
                    "TXT",
                    start,
                    format!("string length {len} exceeds remaining data"),
                )
            })?;
            segments.push(escape(bytes));
        }

        Ok(Self { segments })
    }
}

impl Serialize for TXT {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TXT", 2)?;
        state.serialize_field("data", &self.segments)?;
        state.serialize_field("data_string", &self.data_string())?;
        state.end()
    }
}

impl fmt::Display for TXT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data_string())
    }
}

/// HINFO record - Host Information (RFC 1035).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct HINFO {
    /// CPU type.
    cpu: String,
    /// Operating system.
    os: String,
}

impl HINFO {
    /// Creates a new HINFO record.
    pub fn new(cpu: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            cpu: cpu.into(),
            os: os.into(),
        }
    }

    /// Returns the CPU type.
    #[inline]
    pub fn cpu(&self) -> &str {
        &self.cpu
    }

    /// Returns the operating system.
    #[inline]
    pub fn os(&self) -> &str {
        &self.os
    }

    /// Decodes an HINFO record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let cpu = escape(reader.read_character_string()?);
        let os = escape(reader.read_character_string()?);
        Ok(Self { cpu, os })
    }
}

impl fmt::Display for HINFO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" \"{}\"", self.cpu, self.os)
    }
}
