//! Wire model of the `v3/certificates` response
//!
//! ```json
//! {"data": [{"serial_no": "..", "effective_time": "..", "expire_time": "..",
//!            "encrypt_certificate": {"algorithm": "AEAD_AES_256_GCM",
//!                                    "nonce": "..", "associated_data": "..",
//!                                    "ciphertext": "<base64>"}}]}
//! ```

use crate::error::{FetchError, Result};
use crypto::{Aes256GcmDecryptor, CryptoError};
use serde::Deserialize;
use serde_json::Value;

pub const SUPPORTED_ALGORITHM: &str = "AEAD_AES_256_GCM";

/// One element of the response's `data` array
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateEntry {
    pub serial_no: String,
    pub effective_time: String,
    pub expire_time: String,
    pub encrypt_certificate: EncryptedEnvelope,
}

/// Encrypted-at-rest form of a platform certificate
#[derive(Debug, Clone, Deserialize)]
pub struct EncryptedEnvelope {
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub serial_no: Option<String>,
    pub ciphertext: String,
    pub nonce: String,
    #[serde(default)]
    pub associated_data: String,
}

impl EncryptedEnvelope {
    /// Decrypt into PEM text
    pub fn open(&self, serial_no: &str, decryptor: &Aes256GcmDecryptor) -> Result<String> {
        if let Some(algorithm) = self.algorithm.as_deref() {
            if algorithm != SUPPORTED_ALGORITHM {
                return Err(FetchError::Decryption {
                    serial_no: serial_no.to_string(),
                    reason: format!("unsupported algorithm {}", algorithm),
                });
            }
        }

        decryptor
            .decrypt_base64(
                &self.ciphertext,
                self.nonce.as_bytes(),
                self.associated_data.as_bytes(),
            )
            .map_err(|e| decryption_error(serial_no, e))
    }
}

fn decryption_error(serial_no: &str, err: CryptoError) -> FetchError {
    FetchError::Decryption {
        serial_no: serial_no.to_string(),
        reason: err.to_string(),
    }
}

/// A decrypted platform certificate with its validity metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub serial_number: String,
    /// As delivered by the API, RFC 3339
    pub not_before: String,
    pub not_after: String,
    /// `None` only for the placeholder entry
    pub plaintext: Option<String>,
}

impl CertificateEntry {
    pub fn record(&self, plaintext: Option<String>) -> CertificateRecord {
        CertificateRecord {
            serial_number: self.serial_no.clone(),
            not_before: self.effective_time.clone(),
            not_after: self.expire_time.clone(),
            plaintext,
        }
    }
}

/// Extract the certificate entries of a response body
///
/// A body that is not JSON, or whose `data` is absent or not an array,
/// yields no entries. An element of `data` with the wrong shape is a
/// [`FetchError::MalformedResponse`].
pub fn parse_entries(body: &str) -> Result<Vec<CertificateEntry>> {
    let Ok(document) = serde_json::from_str::<Value>(body) else {
        return Ok(Vec::new());
    };

    let Some(items) = document.get("data").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            CertificateEntry::deserialize(item).map_err(|e| {
                FetchError::MalformedResponse(format!("data[{}]: {}", index, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    fn sealed_entry(serial: &str, plaintext: &str) -> Value {
        let cipher = Aes256GcmDecryptor::new(*KEY).unwrap();
        json!({
            "serial_no": serial,
            "effective_time": "2024-01-01T00:00:00+08:00",
            "expire_time": "2029-01-01T00:00:00+08:00",
            "encrypt_certificate": {
                "algorithm": "AEAD_AES_256_GCM",
                "nonce": "a1b2c3d4e5f6",
                "associated_data": "certificate",
                "ciphertext": cipher.encrypt_base64(plaintext.as_bytes(), b"a1b2c3d4e5f6", b"certificate").unwrap(),
            }
        })
    }

    #[test]
    fn test_parse_and_open() {
        let body = json!({ "data": [sealed_entry("ABC123", "pem text")] }).to_string();
        let entries = parse_entries(&body).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].serial_no, "ABC123");

        let decryptor = Aes256GcmDecryptor::new(*KEY).unwrap();
        let pem = entries[0].encrypt_certificate.open("ABC123", &decryptor).unwrap();
        assert_eq!(pem, "pem text");
    }

    #[test]
    fn test_missing_or_non_array_data_is_empty() {
        assert!(parse_entries("{}").unwrap().is_empty());
        assert!(parse_entries(r#"{"data":null}"#).unwrap().is_empty());
        assert!(parse_entries(r#"{"data":{"serial_no":"X"}}"#).unwrap().is_empty());
        assert!(parse_entries(r#"{"data":"text"}"#).unwrap().is_empty());
        assert!(parse_entries("not json at all").unwrap().is_empty());
        assert!(parse_entries("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_element() {
        let body = json!({ "data": [{ "serial_no": "ABC123" }] }).to_string();
        let err = parse_entries(&body).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
        assert!(err.to_string().contains("data[0]"));
    }

    #[test]
    fn test_wrong_key_is_decryption_failure() {
        let body = json!({ "data": [sealed_entry("ABC123", "pem text")] }).to_string();
        let entries = parse_entries(&body).unwrap();

        let decryptor = Aes256GcmDecryptor::new(*b"fedcba9876543210fedcba9876543210").unwrap();
        let err = entries[0].encrypt_certificate.open("ABC123", &decryptor).unwrap_err();
        assert!(matches!(err, FetchError::Decryption { ref serial_no, .. } if serial_no == "ABC123"));
    }

    #[test]
    fn test_unsupported_algorithm() {
        let mut entry = sealed_entry("ABC123", "pem text");
        entry["encrypt_certificate"]["algorithm"] = json!("AEAD_SM4_GCM");
        let body = json!({ "data": [entry] }).to_string();
        let entries = parse_entries(&body).unwrap();

        let decryptor = Aes256GcmDecryptor::new(*KEY).unwrap();
        let err = entries[0].encrypt_certificate.open("ABC123", &decryptor).unwrap_err();
        assert!(err.to_string().contains("AEAD_SM4_GCM"));
    }

    #[test]
    fn test_record_carries_metadata() {
        let body = json!({ "data": [sealed_entry("ABC123", "pem text")] }).to_string();
        let entries = parse_entries(&body).unwrap();

        let record = entries[0].record(Some("pem text".to_string()));
        assert_eq!(record.serial_number, "ABC123");
        assert_eq!(record.not_before, "2024-01-01T00:00:00+08:00");
        assert_eq!(record.not_after, "2029-01-01T00:00:00+08:00");
        assert_eq!(record.plaintext.as_deref(), Some("pem text"));
    }
}
