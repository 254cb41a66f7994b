//! Service location records (SRV).

use crate::error::Result;
use crate::name::NameDecoder;
use crate::wire::WireReader;
use serde::Serialize;
use std::fmt;

/// SRV record - service location (RFC 2782).
///
/// # Wire Format
///
/// ```text
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                   PRIORITY                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    WEIGHT                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     PORT                      |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                    TARGET                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SRV {
    /// Priority (lower is preferred).
    priority: u16,
    /// Relative weight within a priority.
    weight: u16,
    /// Service port.
    port: u16,
    /// Target host.
    target: String,
}

impl SRV {
    /// Creates a new SRV record.
    pub fn new(priority: u16, weight: u16, port: u16, target: impl Into<String>) -> Self {
        Self {
            priority,
            weight,
            port,
            target: target.into(),
        }
    }

    /// Returns the priority.
    #[inline]
    pub const fn priority(&self) -> u16 {
        self.priority
    }

    /// Returns the weight.
    #[inline]
    pub const fn weight(&self) -> u16 {
        self.weight
    }

    /// Returns the port.
    #[inline]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the target host.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Decodes an SRV record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let priority = reader.read_u16()?;
        let weight = reader.read_u16()?;
        let port = reader.read_u16()?;
        let target = NameDecoder::read(reader)?;
        Ok(Self::new(priority, weight, port, target))
    }
}

impl fmt::Display for SRV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.priority, self.weight, self.port, self.target)
    }
}
