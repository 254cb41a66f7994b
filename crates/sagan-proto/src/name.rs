//! Domain name decoding with compression support (RFC 1035 Section 4.1.4).
//!
//! Names are decoded straight into their presentation form: labels joined
//! by `.` with a trailing `.`, the root name as `"."`. Label bytes outside
//! printable ASCII are escaped as `\DDD`.

use crate::error::{Error, Result};
use crate::wire::WireReader;

/// Maximum number of compression pointer jumps while decoding one name.
///
/// Any pointer cycle hits this limit and fails instead of looping.
pub const MAX_POINTER_JUMPS: usize = 128;

/// Appends `bytes` to `out`, escaping as DNS presentation text.
///
/// Bytes below `0x20` or above `0x7E` become `\DDD` (three decimal digits),
/// `"` and `\` get a backslash prefix. Everything else is copied as is.
pub fn escape_into(bytes: &[u8], out: &mut String) {
    for &byte in bytes {
        match byte {
            b'"' | b'\\' => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7E => out.push(byte as char),
            _ => {
                out.push('\\');
                out.push(char::from(b'0' + byte / 100));
                out.push(char::from(b'0' + (byte / 10) % 10));
                out.push(char::from(b'0' + byte % 10));
            }
        }
    }
}

/// Escapes `bytes` as DNS presentation text.
pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    escape_into(bytes, &mut out);
    out
}

/// Decoder for domain names in a captured DNS message.
///
/// Holds the whole message because compression pointers are absolute
/// offsets into it.
#[derive(Debug, Clone, Copy)]
pub struct NameDecoder<'a> {
    /// The complete message buffer.
    message: &'a [u8],
}

impl<'a> NameDecoder<'a> {
    /// Creates a new name decoder for the given message.
    #[inline]
    pub const fn new(message: &'a [u8]) -> Self {
        Self { message }
    }

    /// Decodes the name starting at `offset`.
    ///
    /// Returns the name and the offset right after it in the buffer: after
    /// the terminating zero byte, or after the first compression pointer if
    /// one was followed. Pointer targets only contribute text.
    pub fn decode(&self, offset: usize) -> Result<(String, usize)> {
        let mut name = String::new();
        let mut pos = offset;
        let mut end = None;
        let mut jumps = 0;

        loop {
            let len = *self
                .message
                .get(pos)
                .ok_or_else(|| Error::unexpected_eof(pos + 1))?;

            match len {
                0 => {
                    end.get_or_insert(pos + 1);
                    break;
                }
                1..=63 => {
                    let start = pos + 1;
                    let stop = start + usize::from(len);
                    let label = self
                        .message
                        .get(start..stop)
                        .ok_or_else(|| Error::unexpected_eof(stop))?;
                    escape_into(label, &mut name);
                    name.push('.');
                    pos = stop;
                }
                0xC0..=0xFF => {
                    let low = *self
                        .message
                        .get(pos + 1)
                        .ok_or_else(|| Error::unexpected_eof(pos + 2))?;
                    let target = (usize::from(len & 0x3F) << 8) | usize::from(low);

                    end.get_or_insert(pos + 2);

                    jumps += 1;
                    if jumps > MAX_POINTER_JUMPS {
                        return Err(Error::PointerLoop {
                            offset: pos,
                            max_jumps: MAX_POINTER_JUMPS,
                        });
                    }
                    if target >= self.message.len() {
                        return Err(Error::PointerOutOfRange { offset: pos, target });
                    }
                    pos = target;
                }
                _ => {
                    return Err(Error::BadLabelLength {
                        offset: pos,
                        length: len,
                    });
                }
            }
        }

        if name.is_empty() {
            name.push('.');
        }

        Ok((name, end.unwrap_or(pos + 1)))
    }

    /// Decodes the name at the reader's position and moves the reader past it.
    ///
    /// The name must end within the reader's limit.
    pub fn read(reader: &mut WireReader<'a>) -> Result<String> {
        let (name, end) = NameDecoder::new(reader.data()).decode(reader.position())?;
        if end > reader.limit() {
            return Err(Error::unexpected_eof(end));
        }
        reader.set_position(end);
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let data = b"\x07example\x03com\x00";
        let (name, end) = NameDecoder::new(data).decode(0).unwrap();
        assert_eq!(name, "example.com.");
        assert_eq!(end, data.len());
    }

    #[test]
    fn test_root_name() {
        let data = [0u8];
        let (name, end) = NameDecoder::new(&data).decode(0).unwrap();
        assert_eq!(name, ".");
        assert_eq!(end, 1);
    }

    #[test]
    fn test_compressed_name() {
        let mut data = b"\x07example\x03com\x00".to_vec();
        // www + pointer to offset 0
        data.extend_from_slice(b"\x03www\xC0\x00");

        let (name, end) = NameDecoder::new(&data).decode(13).unwrap();
        assert_eq!(name, "www.example.com.");
        // Consumes "www" label plus the two pointer bytes, not the target.
        assert_eq!(end, data.len());
    }

    #[test]
    fn test_pointer_chain() {
        // "com." at 0, "example" -> 0 at 5, "www" -> 5 at 15, bare pointer at 21
        let mut data = b"\x03com\x00".to_vec();
        data.extend_from_slice(b"\x07example\xC0\x00");
        data.extend_from_slice(b"\x03www\xC0\x05");
        data.extend_from_slice(b"\xC0\x0F");

        let (name, end) = NameDecoder::new(&data).decode(21).unwrap();
        assert_eq!(name, "www.example.com.");
        assert_eq!(end, 23);
    }

    #[test]
    fn test_pointer_loop_terminates() {
        // Pointer to itself.
        let data = [0xC0, 0x00];
        let err = NameDecoder::new(&data).decode(0).unwrap_err();
        assert!(matches!(err, Error::PointerLoop { max_jumps: MAX_POINTER_JUMPS, .. }));

        // Two pointers bouncing between each other through a label.
        let data = [0x01, b'a', 0xC0, 0x04, 0xC0, 0x00];
        let err = NameDecoder::new(&data).decode(0).unwrap_err();
        assert!(matches!(err, Error::PointerLoop { .. }));
    }

    #[test]
    fn test_bad_label_length() {
        let data = [0x41, b'a'];
        assert_eq!(
            NameDecoder::new(&data).decode(0),
            Err(Error::BadLabelLength {
                offset: 0,
                length: 0x41
            })
        );
    }

    #[test]
    fn test_truncated_names() {
        // Label runs past the end.
        let data = b"\x05ab";
        assert!(NameDecoder::new(data).decode(0).is_err());

        // Missing terminator.
        let data = b"\x02ab";
        assert!(NameDecoder::new(data).decode(0).is_err());

        // Half a pointer.
        let data = [0xC0];
        assert!(NameDecoder::new(&data).decode(0).is_err());

        // Pointer past the end of the buffer.
        let data = [0xC0, 0x10];
        assert_eq!(
            NameDecoder::new(&data).decode(0),
            Err(Error::PointerOutOfRange {
                offset: 0,
                target: 16
            })
        );

        // Offset past the end.
        assert!(NameDecoder::new(&data).decode(5).is_err());
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape(b"plain-text_1"), "plain-text_1");
        assert_eq!(escape(b"a.b"), "a.b");
        assert_eq!(escape(b"say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape(b"back\\slash"), "back\\\\slash");
        assert_eq!(escape(b"Here be \xff dragons!"), "Here be \\255 dragons!");
        assert_eq!(escape(b"\x00\x09\x7f"), "\\000\\009\\127");

        let data = b"\x03a\x01b\x00";
        let (name, _) = NameDecoder::new(data).decode(0).unwrap();
        assert_eq!(name, "a\\001b.");
    }

    #[test]
    fn test_read_respects_limit() {
        let data = b"\x03www\x00\x01\x02";
        let mut reader = WireReader::new(data);
        assert_eq!(NameDecoder::read(&mut reader).unwrap(), "www.");
        assert_eq!(reader.position(), 5);

        let mut reader = WireReader::new(data).with_limit(3);
        assert!(NameDecoder::read(&mut reader).is_err());
    }
}
