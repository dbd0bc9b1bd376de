//! X.509 certificate inspection
//!
//! Platform certificates arrive as PEM text. This module pulls out the
//! pieces the fetcher cares about: serial number, validity window and the
//! DER-encoded SubjectPublicKeyInfo used for signature verification.

use crate::error::{CryptoError, CryptoResult};
use chrono::{DateTime, Utc};
use x509_parser::prelude::*;

/// Facts extracted from one PEM certificate
#[derive(Debug, Clone)]
pub struct CertificateInfo {
    /// Serial number as uppercase hex without leading zeros
    pub serial_hex: String,
    pub subject: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    spki_der: Vec<u8>,
}

impl CertificateInfo {
    /// Parse the first `CERTIFICATE` block of a PEM document
    pub fn from_pem(pem_text: &str) -> CryptoResult<Self> {
        let block = ::pem::parse(pem_text)
            .map_err(|e| CryptoError::InvalidCertificate(format!("PEM decode error: {}", e)))?;

        if block.tag() != "CERTIFICATE" {
            return Err(CryptoError::InvalidCertificate(format!(
                "expected a CERTIFICATE block, found {}",
                block.tag()
            )));
        }

        Self::from_der(block.contents())
    }

    /// Parse a DER-encoded certificate
    pub fn from_der(der: &[u8]) -> CryptoResult<Self> {
        let (_rem, cert) = X509Certificate::from_der(der)
            .map_err(|e| CryptoError::InvalidCertificate(format!("X.509 parse error: {}", e)))?;

        let not_before = DateTime::<Utc>::from_timestamp(cert.validity().not_before.timestamp(), 0)
            .ok_or_else(|| CryptoError::InvalidCertificate("invalid notBefore".to_string()))?;
        let not_after = DateTime::<Utc>::from_timestamp(cert.validity().not_after.timestamp(), 0)
            .ok_or_else(|| CryptoError::InvalidCertificate("invalid notAfter".to_string()))?;

        Ok(Self {
            serial_hex: cert.serial.to_str_radix(16).to_uppercase(),
            subject: cert.subject().to_string(),
            not_before,
            not_after,
            spki_der: cert.public_key().raw.to_vec(),
        })
    }

    /// Compare with a serial as printed by the platform API (hex, any case,
    /// possibly zero-padded)
    pub fn matches_serial(&self, serial: &str) -> bool {
        let wanted = serial.trim().trim_start_matches('0');
        let own = self.serial_hex.trim_start_matches('0');
        !wanted.is_empty() && own.eq_ignore_ascii_case(wanted)
    }

    /// Whether `now` lies inside the validity window
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.not_before <= now && now <= self.not_after
    }

    /// DER-encoded SubjectPublicKeyInfo
    pub fn public_key_der(&self) -> &[u8] {
        &self.spki_der
    }
}
