//! DNS resource records.
//!
//! A record is read in two steps. [`RecordHeader::read`] takes the owner
//! name, the fixed 10 bytes and checks that the RDATA window fits in the
//! buffer; after that the position of the next record is known no matter
//! what the RDATA holds. The RDATA itself is decoded separately so a bad
//! body costs one record, not the rest of the message.

use crate::class::Class;
use crate::error::{Error, Result};
use crate::name::NameDecoder;
use crate::rdata::RData;
use crate::rtype::{RecordType, Type};
use crate::wire::WireReader;
use serde::Serialize;
use std::fmt;

/// Size of the fixed TYPE, CLASS, TTL and RDLENGTH fields.
pub const RECORD_FIXED_SIZE: usize = 10;

/// The envelope of a resource record: everything except the RDATA.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     NAME                      /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     TYPE                      |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     CLASS                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TTL                      |
/// |                                               |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                   RDLENGTH                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     RDATA                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    /// Owner name.
    pub name: String,
    /// Record type.
    pub rtype: Type,
    /// Raw CLASS field (the UDP size for OPT).
    pub class: u16,
    /// Raw TTL field (flags for OPT).
    pub ttl: u32,
    /// RDATA length.
    pub rdlength: u16,
    /// Offset of the first RDATA byte.
    pub rdata_offset: usize,
}

impl RecordHeader {
    /// Reads a record envelope and moves the reader past its RDATA.
    ///
    /// Fails if the name is broken, the fixed fields are cut short, or the
    /// RDATA would run past the end of the buffer.
    pub fn read(reader: &mut WireReader<'_>) -> Result<Self> {
        let name = NameDecoder::read(reader)?;
        if reader.remaining() < RECORD_FIXED_SIZE {
            return Err(Error::buffer_too_short(
                reader.position() + RECORD_FIXED_SIZE,
                reader.data().len(),
            ));
        }

        let rtype = Type::from_u16(reader.read_u16()?);
        let class = reader.read_u16()?;
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()?;
        let rdata_offset = reader.position();

        let rdata_end = rdata_offset + usize::from(rdlength);
        if rdata_end > reader.limit() {
            return Err(Error::buffer_too_short(rdata_end, reader.data().len()));
        }
        reader.set_position(rdata_end);

        Ok(Self {
            name,
            rtype,
            class,
            ttl,
            rdlength,
            rdata_offset,
        })
    }

    /// Returns true if this is an OPT pseudo-record.
    #[inline]
    pub fn is_opt(&self) -> bool {
        self.rtype.is(RecordType::OPT)
    }

    /// Returns the offset right after the RDATA.
    #[inline]
    pub fn rdata_end(&self) -> usize {
        self.rdata_offset + usize::from(self.rdlength)
    }

    /// Returns a reader over the RDATA window of `message`.
    pub fn rdata_reader<'a>(&self, message: &'a [u8]) -> WireReader<'a> {
        WireReader::at(message, self.rdata_offset).with_limit(self.rdata_end())
    }

    /// Decodes the RDATA and builds the full record.
    pub fn into_record(self, message: &[u8]) -> Result<ResourceRecord> {
        let rdata = RData::decode(self.rtype, &mut self.rdata_reader(message))?;
        Ok(ResourceRecord {
            name: self.name,
            rtype: self.rtype,
            class: Some(Class::from_u16(self.class)),
            ttl: Some(self.ttl),
            rdlength: Some(self.rdlength),
            rdata,
        })
    }
}

/// A DNS resource record.
///
/// Class, TTL and RDLENGTH are always present for records decoded from the
/// wire. Records rebuilt from legacy result fields may lack them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceRecord {
    /// Owner name.
    pub name: String,

    /// Record type.
    #[serde(rename = "type")]
    pub rtype: Type,

    /// Record class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<Class>,

    /// Time to live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// RDATA length as declared on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdlength: Option<u16>,

    /// Record data.
    pub rdata: RData,
}

impl ResourceRecord {
    /// Reads a complete record at the reader's position.
    pub fn read(reader: &mut WireReader<'_>) -> Result<Self> {
        RecordHeader::read(reader)?.into_record(reader.data())
    }

    /// Returns the record type.
    #[inline]
    pub fn record_type(&self) -> Type {
        self.rtype
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ttl = self.ttl.map(|ttl| ttl.to_string()).unwrap_or_default();
        let class = self.class.map(|class| class.to_string()).unwrap_or_default();
        write!(
            f,
            "{:<22}  {:<8} {:<6} {:<6} {}",
            self.name, ttl, class, self.rtype, self.rdata
        )
    }
}
