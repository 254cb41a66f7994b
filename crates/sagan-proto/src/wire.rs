//! Wire format reading.
//!
//! [`WireReader`] is a bounds-checked cursor over a captured DNS message.
//! Every read reports [`Error::UnexpectedEof`] instead of reading past the
//! end, so higher layers can turn short reads into decode issues.

use crate::error::{Error, Result};

/// A cursor for reading DNS wire format data.
///
/// The reader always sees the whole message (compression pointers refer to
/// absolute offsets) but can be limited to a window, such as the RDATA of
/// one record, with [`WireReader::with_limit`].
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    /// The complete message.
    data: &'a [u8],
    /// Current position.
    pos: usize,
    /// Reads may not go past this offset.
    limit: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a new wire reader over the whole buffer.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            limit: data.len(),
        }
    }

    /// Creates a reader starting at `pos`.
    #[inline]
    pub const fn at(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos,
            limit: data.len(),
        }
    }

    /// Restricts reads to end at `limit` (clamped to the buffer length).
    #[inline]
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(self.data.len());
        self
    }

    /// Returns the complete underlying message.
    #[inline]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the current position.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the read limit.
    #[inline]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of bytes left before the limit.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.pos)
    }

    /// Returns true if there are no bytes left before the limit.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Sets the position.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Checks that `n` more bytes are available.
    #[inline]
    fn ensure(&self, n: usize) -> Result<()> {
        match self.pos.checked_add(n) {
            Some(end) if end <= self.limit => Ok(()),
            _ => Err(Error::unexpected_eof(self.pos.saturating_add(n))),
        }
    }

    /// Advances the position by the given amount.
    #[inline]
    pub fn advance(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    /// Reads a big-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        let value = u16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    /// Reads a big-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        let p = self.pos;
        let value = u32::from_be_bytes([
            self.data[p],
            self.data[p + 1],
            self.data[p + 2],
            self.data[p + 3],
        ]);
        self.pos += 4;
        Ok(value)
    }

    /// Reads a slice of bytes.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Reads everything up to the limit.
    #[inline]
    pub fn read_rest(&mut self) -> &'a [u8] {
        let start = self.pos.min(self.limit);
        self.pos = self.limit.max(self.pos);
        &self.data[start..self.limit]
    }

    /// Reads a `<length><bytes>` character-string.
    #[inline]
    pub fn read_character_string(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u8()?;
        self.read_bytes(len as usize)
    }

    /// Peeks at a single byte without advancing.
    #[inline]
    pub fn peek_u8(&self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.data[self.pos])
    }

    /// Returns a slice at the given offset without advancing.
    ///
    /// Only the buffer length bounds this, not the limit.
    #[inline]
    pub fn slice_at(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| Error::buffer_too_short(offset.saturating_add(len), self.data.len()))
    }
}
