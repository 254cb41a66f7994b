//! DNSSEC record types (DS, DNSKEY, RRSIG, NSEC, NSEC3, NSEC3PARAM).
//!
//! Binary fields are kept in their usual presentation encodings: digests and
//! salts as lowercase hex, keys and signatures as padded base64, NSEC3 owner
//! hashes as unpadded base32 with the extended hex alphabet (RFC 5155).
//! Nothing here validates signatures.

use crate::error::{Error, Result};
use crate::name::NameDecoder;
use crate::rtype::Type;
use crate::wire::WireReader;
use chrono::{DateTime, Utc};
use data_encoding::{BASE32_NOPAD, BASE64, HEXLOWER};
use serde::Serialize;
use std::fmt;

// =============================================================================
// Helpers
// =============================================================================

/// Standard base32 alphabet, in value order.
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Extended hex alphabet, lowercase, in value order.
const BASE32_HEX_ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// Remaps standard base32 text to the lowercase extended hex alphabet.
///
/// Both alphabets encode the same 5-bit values, so this is a per-character
/// substitution. Characters outside the standard alphabet are kept.
pub fn base32_to_extended_hex(text: &str) -> String {
    text.chars()
        .map(|c| {
            BASE32_ALPHABET
                .iter()
                .position(|&b| char::from(b) == c)
                .map_or(c, |i| char::from(BASE32_HEX_ALPHABET[i]))
        })
        .collect()
}

/// Decodes an NSEC/NSEC3 type bitmap filling the rest of the reader's window.
///
/// The bitmap is a list of `[window][length][bits]` blocks. Bit `j` (most
/// significant first) of byte `i` in window `w` stands for type
/// `w * 256 + i * 8 + j`.
pub fn decode_types_bitmap(reader: &mut WireReader<'_>) -> Result<Vec<Type>> {
    let mut types = Vec::new();

    while !reader.is_empty() {
        let start = reader.position();
        if reader.remaining() < 2 {
            return Err(Error::types_bitmap(
                start,
                format!("offset out of range: data size = {}", reader.remaining()),
            ));
        }
        let window = u32::from(reader.read_u8()?);
        let len = reader.read_u8()?;
        let bits = reader.read_bytes(usize::from(len)).map_err(|_| {
            Error::types_bitmap(start, format!("window {window} bitmap length {len} exceeds data"))
        })?;

        for (i, byte) in (0u32..).zip(bits) {
            for j in 0..8u32 {
                if byte & (0x80u8 >> j) == 0 {
                    continue;
                }
                let code = u16::try_from(window * 256 + i * 8 + j)
                    .map_err(|_| Error::types_bitmap(start, format!("window {window} overflows type range")))?;
                types.push(Type::from_u16(code));
            }
        }
    }

    Ok(types)
}

fn write_types(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for rtype in types {
        write!(f, " {rtype}")?;
    }
    Ok(())
}

fn salt_text(salt: &str) -> &str {
    if salt.is_empty() { "-" } else { salt }
}

/// Formats an RRSIG timestamp as `YYYYMMDDHHMMSS` (UTC).
fn signature_time(seconds: u32) -> String {
    DateTime::<Utc>::from_timestamp(i64::from(seconds), 0)
        .map_or_else(|| seconds.to_string(), |dt| dt.format("%Y%m%d%H%M%S").to_string())
}

// =============================================================================
// DS
// =============================================================================

/// DS record - Delegation Signer (RFC 4034).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DS {
    /// Key tag of the referenced DNSKEY.
    tag: u16,
    /// Algorithm number.
    algorithm: u8,
    /// Digest type.
    digest_type: u8,
    /// Digest, lowercase hex.
    delegation_key: String,
}

impl DS {
    /// Returns the key tag.
    #[inline]
    pub const fn tag(&self) -> u16 {
        self.tag
    }

    /// Returns the algorithm number.
    #[inline]
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Returns the digest type.
    #[inline]
    pub const fn digest_type(&self) -> u8 {
        self.digest_type
    }

    /// Returns the digest as lowercase hex.
    #[inline]
    pub fn delegation_key(&self) -> &str {
        &self.delegation_key
    }

    /// Decodes a DS record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            tag: reader.read_u16()?,
            algorithm: reader.read_u8()?,
            digest_type: reader.read_u8()?,
            delegation_key: HEXLOWER.encode(reader.read_rest()),
        })
    }
}

impl fmt::Display for DS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.tag, self.algorithm, self.digest_type, self.delegation_key
        )
    }
}

// =============================================================================
// DNSKEY
// =============================================================================

/// DNSKEY record - DNS Public Key (RFC 4034).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DNSKEY {
    /// Flags (bit 7 = zone key, bit 15 = secure entry point).
    flags: u16,
    /// Protocol (always 3).
    protocol: u8,
    /// Algorithm number.
    algorithm: u8,
    /// Public key, padded base64.
    key: String,
}

impl DNSKEY {
    /// Zone Key flag.
    pub const FLAG_ZONE: u16 = 0x0100;

    /// Secure Entry Point flag (KSK indicator).
    pub const FLAG_SEP: u16 = 0x0001;

    /// Returns the flags.
    #[inline]
    pub const fn flags(&self) -> u16 {
        self.flags
    }

    /// Returns the protocol field.
    #[inline]
    pub const fn protocol(&self) -> u8 {
        self.protocol
    }

    /// Returns the algorithm number.
    #[inline]
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Returns the public key as base64.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true if this is a key signing key.
    #[inline]
    pub const fn is_ksk(&self) -> bool {
        self.flags & Self::FLAG_ZONE != 0 && self.flags & Self::FLAG_SEP != 0
    }

    /// Decodes a DNSKEY record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            flags: reader.read_u16()?,
            protocol: reader.read_u8()?,
            algorithm: reader.read_u8()?,
            key: BASE64.encode(reader.read_rest()),
        })
    }
}

impl fmt::Display for DNSKEY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.flags, self.protocol, self.algorithm, self.key)
    }
}

// =============================================================================
// RRSIG
// =============================================================================

/// RRSIG record - DNSSEC Signature (RFC 4034).
///
/// The signer name is read like any other name, so a compressed signer is
/// accepted even though senders should not compress it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RRSIG {
    /// Type covered by this signature.
    type_covered: Type,
    /// Algorithm number.
    algorithm: u8,
    /// Number of labels in the original owner name.
    labels: u8,
    /// Original TTL.
    original_ttl: u32,
    /// Signature expiration (seconds since epoch).
    signature_expiration: u32,
    /// Signature inception (seconds since epoch).
    signature_inception: u32,
    /// Key tag.
    key_tag: u16,
    /// Signer's name.
    signer_name: String,
    /// Signature, padded base64.
    signature: String,
}

impl RRSIG {
    /// Returns the type covered.
    #[inline]
    pub const fn type_covered(&self) -> Type {
        self.type_covered
    }

    /// Returns the algorithm number.
    #[inline]
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Returns the label count.
    #[inline]
    pub const fn labels(&self) -> u8 {
        self.labels
    }

    /// Returns the original TTL.
    #[inline]
    pub const fn original_ttl(&self) -> u32 {
        self.original_ttl
    }

    /// Returns the expiration as seconds since the epoch.
    #[inline]
    pub const fn signature_expiration(&self) -> u32 {
        self.signature_expiration
    }

    /// Returns the inception as seconds since the epoch.
    #[inline]
    pub const fn signature_inception(&self) -> u32 {
        self.signature_inception
    }

    /// Returns the expiration time.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.signature_expiration), 0)
    }

    /// Returns the inception time.
    pub fn incepted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.signature_inception), 0)
    }

    /// Returns the key tag.
    #[inline]
    pub const fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// Returns the signer's name.
    #[inline]
    pub fn signer_name(&self) -> &str {
        &self.signer_name
    }

    /// Returns the signature as base64.
    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Decodes an RRSIG record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            type_covered: Type::from_u16(reader.read_u16()?),
            algorithm: reader.read_u8()?,
            labels: reader.read_u8()?,
            original_ttl: reader.read_u32()?,
            signature_expiration: reader.read_u32()?,
            signature_inception: reader.read_u32()?,
            key_tag: reader.read_u16()?,
            signer_name: NameDecoder::read(reader)?,
            signature: BASE64.encode(reader.read_rest()),
        })
    }
}

impl fmt::Display for RRSIG {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {}",
            self.type_covered,
            self.algorithm,
            self.labels,
            self.original_ttl,
            signature_time(self.signature_expiration),
            signature_time(self.signature_inception),
            self.key_tag,
            self.signer_name,
            self.signature
        )
    }
}

// =============================================================================
// NSEC
// =============================================================================

/// NSEC record - Next Secure (RFC 4034).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NSEC {
    /// Next owner name in canonical order.
    next_domain_name: String,
    /// Types present at the owner name.
    types: Vec<Type>,
}

impl NSEC {
    /// Returns the next owner name.
    #[inline]
    pub fn next_domain_name(&self) -> &str {
        &self.next_domain_name
    }

    /// Returns the types present at the owner name.
    #[inline]
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// Decodes an NSEC record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let next_domain_name = NameDecoder::read(reader)?;
        let types = decode_types_bitmap(reader)?;
        Ok(Self {
            next_domain_name,
            types,
        })
    }
}

impl fmt::Display for NSEC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.next_domain_name)?;
        write_types(f, &self.types)
    }
}

// =============================================================================
// NSEC3
// =============================================================================

/// NSEC3 record - Hashed Next Secure (RFC 5155).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NSEC3 {
    /// Hash algorithm (1 = SHA-1).
    hash_algorithm: u8,
    /// Flags (bit 0 = opt-out).
    flags: u8,
    /// Additional hash iterations.
    iterations: u16,
    /// Salt, lowercase hex (empty for no salt).
    salt: String,
    /// Next hashed owner name, base32 extended hex.
    hash: String,
    /// Types present at the original owner name.
    types: Vec<Type>,
}

impl NSEC3 {
    /// Opt-out flag.
    pub const FLAG_OPT_OUT: u8 = 0x01;

    /// Returns the hash algorithm.
    #[inline]
    pub const fn hash_algorithm(&self) -> u8 {
        self.hash_algorithm
    }

    /// Returns the flags.
    #[inline]
    pub const fn flags(&self) -> u8 {
        self.flags
    }

    /// Returns true if the opt-out flag is set.
    #[inline]
    pub const fn is_opt_out(&self) -> bool {
        self.flags & Self::FLAG_OPT_OUT != 0
    }

    /// Returns the iteration count.
    #[inline]
    pub const fn iterations(&self) -> u16 {
        self.iterations
    }

    /// Returns the salt as hex.
    #[inline]
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Returns the next hashed owner name.
    #[inline]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Returns the types present.
    #[inline]
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// Decodes an NSEC3 record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let hash_algorithm = reader.read_u8()?;
        let flags = reader.read_u8()?;
        let iterations = reader.read_u16()?;
        let salt = HEXLOWER.encode(reader.read_character_string()?);
        let hash = base32_to_extended_hex(&BASE32_NOPAD.encode(reader.read_character_string()?));
        let types = decode_types_bitmap(reader)?;

        Ok(Self {
            hash_algorithm,
            flags,
            iterations,
            salt,
            hash,
            types,
        })
    }
}

impl fmt::Display for NSEC3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.hash_algorithm,
            self.flags,
            self.iterations,
            salt_text(&self.salt),
            self.hash
        )?;
        write_types(f, &self.types)
    }
}

// =============================================================================
// NSEC3PARAM
// =============================================================================

/// NSEC3PARAM record - NSEC3 Parameters (RFC 5155).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NSEC3PARAM {
    /// Hash algorithm.
    algorithm: u8,
    /// Flags.
    flags: u8,
    /// Additional hash iterations.
    iterations: u16,
    /// Salt, lowercase hex.
    salt: String,
}

impl NSEC3PARAM {
    /// Returns the hash algorithm.
    #[inline]
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Returns the flags.
    #[inline]
    pub const fn flags(&self) -> u8 {
        self.flags
    }

    /// Returns the iteration count.
    #[inline]
    pub const fn iterations(&self) -> u16 {
        self.iterations
    }

    /// Returns the salt as hex.
    #[inline]
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Decodes an NSEC3PARAM record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            algorithm: reader.read_u8()?,
            flags: reader.read_u8()?,
            iterations: reader.read_u16()?,
            salt: HEXLOWER.encode(reader.read_character_string()?),
        })
    }
}

impl fmt::Display for NSEC3PARAM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.algorithm,
            self.flags,
            self.iterations,
            salt_text(&self.salt)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtype::RecordType;

    #[test]
    fn test_base32_remap() {
        assert_eq!(
            base32_to_extended_hex("ABCDEFGHIJKLMNOPQRSTUVWXYZ234567"),
            "0123456789abcdefghijklmnopqrstuv"
        );
    }

    #[test]
    fn test_remap_matches_base32hex() {
        let hash = [0x9d, 0x3c, 0x4e, 0xc7, 0x2a, 0x3f, 0x38, 0x11, 0x57, 0x00];
        let remapped = base32_to_extended_hex(&BASE32_NOPAD.encode(&hash));
        assert_eq!(remapped, data_encoding::BASE32HEX_NOPAD.encode(&hash).to_lowercase());
    }

    #[test]
    fn test_types_bitmap() {
        // Window 0: NS(2), and window 0 byte 5: DS(43), RRSIG(46), NSEC(47)
        let data = [0x00, 0x06, 0x20, 0x00, 0x00, 0x00, 0x00, 0x13];
        let types = decode_types_bitmap(&mut WireReader::new(&data)).unwrap();
        let codes: Vec<u16> = types.iter().map(|t| t.to_u16()).collect();
        assert_eq!(codes, [2, 43, 46, 47]);
    }

    #[test]
    fn test_types_bitmap_second_window() {
        // Window 1, first bit: type 256
        let data = [0x01, 0x01, 0x80];
        let types = decode_types_bitmap(&mut WireReader::new(&data)).unwrap();
        assert_eq!(types, [Type::Unknown(256)]);
    }

    #[test]
    fn test_types_bitmap_errors() {
        let err = decode_types_bitmap(&mut WireReader::new(&[0x00])).unwrap_err();
        assert!(matches!(err, Error::TypesBitmap { .. }));

        let err = decode_types_bitmap(&mut WireReader::new(&[0x00, 0x04, 0x40])).unwrap_err();
        assert!(matches!(err, Error::TypesBitmap { offset: 0, .. }));
    }

    #[test]
    fn test_ds() {
        let data = [0xF4, 0x42, 0x08, 0x02, 0xDE, 0xAD, 0xBE, 0xEF];
        let ds = DS::decode(&mut WireReader::new(&data)).unwrap();
        assert_eq!(ds.tag(), 62530);
        assert_eq!(ds.algorithm(), 8);
        assert_eq!(ds.delegation_key(), "deadbeef");
        assert_eq!(ds.to_string(), "62530 8 2 deadbeef");

        assert!(DS::decode(&mut WireReader::new(&data[..3])).is_err());
    }

    #[test]
    fn test_dnskey() {
        let data = [0x01, 0x01, 0x03, 0x08, b'a', b'b', b'c', b'd'];
        let key = DNSKEY::decode(&mut WireReader::new(&data)).unwrap();
        assert_eq!(key.flags(), 257);
        assert!(key.is_ksk());
        assert_eq!(key.key(), "YWJjZA==");
        assert_eq!(key.to_string(), "257 3 8 YWJjZA==");
    }

    #[test]
    fn test_rrsig() {
        let mut data = vec![0x00, 0x2F, 0x08, 0x00];
        data.extend_from_slice(&86400u32.to_be_bytes());
        data.extend_from_slice(&1_400_000_000u32.to_be_bytes());
        data.extend_from_slice(&1_399_000_000u32.to_be_bytes());
        data.extend_from_slice(&62530u16.to_be_bytes());
        data.push(0x00);
        data.extend_from_slice(b"sig");

        let sig = RRSIG::decode(&mut WireReader::new(&data)).unwrap();
        assert!(sig.type_covered().is(RecordType::NSEC));
        assert_eq!(sig.key_tag(), 62530);
        assert_eq!(sig.signer_name(), ".");
        assert_eq!(sig.signature(), "c2ln");
        assert_eq!(
            sig.to_string(),
            "NSEC 8 0 86400 20140513165320 20140502030640 62530 . c2ln"
        );
    }

    #[test]
    fn test_nsec() {
        let data = [0x03, b'a', b'b', b'b', 0x00, 0x00, 0x06, 0x20, 0x00, 0x00, 0x00, 0x00, 0x13];
        let nsec = NSEC::decode(&mut WireReader::new(&data)).unwrap();
        assert_eq!(nsec.next_domain_name(), "abb.");
        assert_eq!(nsec.to_string(), "abb. NS DS RRSIG NSEC");
    }

    #[test]
    fn test_nsec3() {
        let mut data = vec![0x01, 0x01, 0x00, 0x0A, 0x02, 0xAB, 0xCD, 0x05];
        data.extend_from_slice(&[0x00; 5]);
        data.extend_from_slice(&[0x00, 0x01, 0x40]);

        let nsec3 = NSEC3::decode(&mut WireReader::new(&data)).unwrap();
        assert_eq!(nsec3.hash_algorithm(), 1);
        assert!(nsec3.is_opt_out());
        assert_eq!(nsec3.iterations(), 10);
        assert_eq!(nsec3.salt(), "abcd");
        assert_eq!(nsec3.hash(), "00000000");
        assert_eq!(nsec3.types(), [Type::Known(RecordType::A)]);
        assert_eq!(nsec3.to_string(), "1 1 10 abcd 00000000 A");
    }

    #[test]
    fn test_nsec3_truncated_hash() {
        let data = [0x01, 0x00, 0x00, 0x00, 0x00, 0x14, 0xAA];
        assert!(NSEC3::decode(&mut WireReader::new(&data)).is_err());
    }

    #[test]
    fn test_nsec3param_empty_salt() {
        let data = [0x01, 0x00, 0x00, 0x00, 0x00];
        let param = NSEC3PARAM::decode(&mut WireReader::new(&data)).unwrap();
        assert_eq!(param.salt(), "");
        assert_eq!(param.to_string(), "1 0 0 -");
    }
}
