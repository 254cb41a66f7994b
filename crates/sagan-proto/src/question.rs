//! DNS question section.
//!
//! Each question has a domain name, query type, and query class.

use crate::class::Class;
use crate::error::Result;
use crate::name::NameDecoder;
use crate::rtype::Type;
use crate::wire::WireReader;
use serde::Serialize;
use std::fmt;

/// A DNS question.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     QNAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     QTYPE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     QCLASS                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Question {
    /// The domain name being queried.
    pub name: String,

    /// The type of record being requested.
    #[serde(rename = "type")]
    pub qtype: Type,

    /// The class of the query.
    #[serde(rename = "class")]
    pub qclass: Class,
}

impl Question {
    /// Creates a new question.
    #[inline]
    pub fn new(name: impl Into<String>, qtype: Type, qclass: Class) -> Self {
        Self {
            name: name.into(),
            qtype,
            qclass,
        }
    }

    /// Decodes a question at the reader's position.
    pub fn read(reader: &mut WireReader<'_>) -> Result<Self> {
        let name = NameDecoder::read(reader)?;
        let qtype = Type::from_u16(reader.read_u16()?);
        let qclass = Class::from_u16(reader.read_u16()?);
        Ok(Self { name, qtype, qclass })
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ";{:<29} {:<6} {}", self.name, self.qclass, self.qtype)
    }
}
