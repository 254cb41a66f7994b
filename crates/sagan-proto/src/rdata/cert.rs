//! Certificate association records (SSHFP, TLSA).

use crate::error::Result;
use crate::wire::WireReader;
use data_encoding::HEXLOWER;
use serde::Serialize;
use std::fmt;

/// SSHFP record - SSH Key Fingerprint (RFC 4255).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SSHFP {
    /// Key algorithm (1 = RSA, 2 = DSA, 3 = ECDSA, 4 = Ed25519).
    algorithm: u8,
    /// Fingerprint type (1 = SHA-1, 2 = SHA-256).
    digest_type: u8,
    /// Fingerprint, lowercase hex.
    fingerprint: String,
}

impl SSHFP {
    /// Returns the key algorithm.
    #[inline]
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Returns the fingerprint type.
    #[inline]
    pub const fn digest_type(&self) -> u8 {
        self.digest_type
    }

    /// Returns the fingerprint as hex.
    #[inline]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Decodes an SSHFP record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            algorithm: reader.read_u8()?,
            digest_type: reader.read_u8()?,
            fingerprint: HEXLOWER.encode(reader.read_rest()),
        })
    }
}

impl fmt::Display for SSHFP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.algorithm, self.digest_type, self.fingerprint)
    }
}

/// TLSA record - TLS certificate association (RFC 6698).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TLSA {
    /// Certificate usage (0-3).
    cert_usage: u8,
    /// Selector (0 = full certificate, 1 = SubjectPublicKeyInfo).
    selector: u8,
    /// Matching type (0 = exact, 1 = SHA-256, 2 = SHA-512).
    matching_type: u8,
    /// Association data, lowercase hex.
    certificate_associated_data: String,
}

impl TLSA {
    /// Returns the certificate usage.
    #[inline]
    pub const fn cert_usage(&self) -> u8 {
        self.cert_usage
    }

    /// Returns the selector.
    #[inline]
    pub const fn selector(&self) -> u8 {
        self.selector
    }

    /// Returns the matching type.
    #[inline]
    pub const fn matching_type(&self) -> u8 {
        self.matching_type
    }

    /// Returns the association data as hex.
    #[inline]
    pub fn certificate_associated_data(&self) -> &str {
        &self.certificate_associated_data
    }

    /// Decodes a TLSA record from an RDATA window.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            cert_usage: reader.read_u8()?,
            selector: reader.read_u8()?,
            matching_type: reader.read_u8()?,
            certificate_associated_data: HEXLOWER.encode(reader.read_rest()),
        })
    }
}

impl fmt::Display for TLSA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.cert_usage, self.selector, self.matching_type, self.certificate_associated_data
        )
    }
}
