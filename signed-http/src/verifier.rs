//! Response signature verification
//!
//! The platform signs `TIMESTAMP\nNONCE\nBODY\n` with the private key of one
//! of its certificates and names that certificate in `Wechatpay-Serial`.

use crate::error::{HttpError, Result};
use crate::response::RawResponse;
use crypto::RsaVerifier;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

pub const HEADER_TIMESTAMP: &str = "Wechatpay-Timestamp";
pub const HEADER_NONCE: &str = "Wechatpay-Nonce";
pub const HEADER_SERIAL: &str = "Wechatpay-Serial";
pub const HEADER_SIGNATURE: &str = "Wechatpay-Signature";

/// Accepted distance between the response timestamp and the local clock
pub const DEFAULT_MAX_SKEW_SECS: i64 = 300;

/// Lookup of platform certificate PEM text by serial number
///
/// `None` means the serial is unknown or only reserved without key material.
pub trait CertificateSource {
    fn certificate(&self, serial: &str) -> Option<String>;
}

impl CertificateSource for HashMap<String, Option<String>> {
    fn certificate(&self, serial: &str) -> Option<String> {
        self.get(serial).cloned().flatten()
    }
}

impl CertificateSource for BTreeMap<String, Option<String>> {
    fn certificate(&self, serial: &str) -> Option<String> {
        self.get(serial).cloned().flatten()
    }
}

#[derive(Debug, Clone)]
pub struct ResponseVerifier<S> {
    source: S,
    max_skew_secs: i64,
}

impl<S: CertificateSource> ResponseVerifier<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_skew_secs: DEFAULT_MAX_SKEW_SECS,
        }
    }

    pub fn with_max_skew(mut self, secs: i64) -> Self {
        self.max_skew_secs = secs;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Verify against the local clock
    pub fn verify(&self, response: &RawResponse) -> Result<()> {
        self.verify_at(response, chrono::Utc::now().timestamp())
    }

    /// Verify as if the local clock read `now` (unix seconds)
    pub fn verify_at(&self, response: &RawResponse, now: i64) -> Result<()> {
        let timestamp = required_header(response, HEADER_TIMESTAMP)?;
        let nonce = required_header(response, HEADER_NONCE)?;
        let serial = required_header(response, HEADER_SERIAL)?;
        let signature = required_header(response, HEADER_SIGNATURE)?;

        let signed_at: i64 = timestamp.trim().parse().map_err(|_| {
            HttpError::Verification(format!("malformed {} header: {}", HEADER_TIMESTAMP, timestamp))
        })?;

        if now.abs_diff(signed_at) > self.max_skew_secs.unsigned_abs() {
            return Err(HttpError::Verification(format!(
                "response timestamp {} is more than {}s away from local time {}",
                signed_at, self.max_skew_secs, now
            )));
        }

        let certificate = self.source.certificate(serial).ok_or_else(|| {
            HttpError::Verification(format!("no platform certificate loaded for serial {}", serial))
        })?;

        let verifier = RsaVerifier::from_certificate_pem(&certificate)
            .map_err(|e| HttpError::Verification(format!("certificate {}: {}", serial, e)))?;

        let message = format!("{}\n{}\n{}\n", timestamp, nonce, response.body);
        verifier
            .verify_base64(message.as_bytes(), signature)
            .map_err(|e| HttpError::Verification(format!("certificate {}: {}", serial, e)))?;

        debug!(serial_no = %serial, "response signature verified");
        Ok(())
    }
}

fn required_header<'a>(response: &'a RawResponse, name: &str) -> Result<&'a str> {
    response
        .header(name)
        .ok_or_else(|| HttpError::Verification(format!("missing {} header", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto::RsaSigner;
    use reqwest::header::{HeaderMap, HeaderValue};

    const PLATFORM_KEY: &str = include_str!("../../fixtures/platform_key.pem");
    const PLATFORM_CERT: &str = include_str!("../../fixtures/platform_cert.pem");
    const MERCHANT_KEY: &str = include_str!("../../fixtures/merchant_key.pem");
    const NOW: i64 = 1_700_000_000;

    fn signed_response(key: &str, serial: &str, timestamp: i64, body: &str) -> RawResponse {
        let signer = RsaSigner::from_pem(key).unwrap();
        let signature = signer
            .sign_base64(format!("{}\n{}\n{}\n", timestamp, "nonce", body).as_bytes())
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(HEADER_TIMESTAMP, HeaderValue::from_str(&timestamp.to_string()).unwrap());
        headers.insert(HEADER_NONCE, HeaderValue::from_static("nonce"));
        headers.insert(HEADER_SERIAL, HeaderValue::from_str(serial).unwrap());
        headers.insert(HEADER_SIGNATURE, HeaderValue::from_str(&signature).unwrap());
        RawResponse::new(200, headers, body)
    }

    fn source() -> HashMap<String, Option<String>> {
        let mut certs = HashMap::new();
        certs.insert("any".to_string(), None);
        certs.insert("ABC123".to_string(), Some(PLATFORM_CERT.to_string()));
        certs
    }

    #[test]
    fn test_valid_response() {
        let verifier = ResponseVerifier::new(source());
        let response = signed_response(PLATFORM_KEY, "ABC123", NOW, r#"{"data":[]}"#);

        verifier.verify_at(&response, NOW + 10).unwrap();
    }

    #[test]
    fn test_tampered_body() {
        let verifier = ResponseVerifier::new(source());
        let mut response = signed_response(PLATFORM_KEY, "ABC123", NOW, r#"{"data":[]}"#);
        response.body = r#"{"data":[{}]}"#.to_string();

        let result = verifier.verify_at(&response, NOW);
        assert!(matches!(result, Err(HttpError::Verification(_))));
    }

    #[test]
    fn test_wrong_signing_key() {
        let verifier = ResponseVerifier::new(source());
        let response = signed_response(MERCHANT_KEY, "ABC123", NOW, "{}");

        assert!(verifier.verify_at(&response, NOW).is_err());
    }

    #[test]
    fn test_unknown_serial() {
        let verifier = ResponseVerifier::new(source());
        let response = signed_response(PLATFORM_KEY, "FFFFFF", NOW, "{}");

        let err = verifier.verify_at(&response, NOW).unwrap_err();
        assert!(err.to_string().contains("FFFFFF"));
    }

    #[test]
    fn test_placeholder_serial_has_no_key() {
        let verifier = ResponseVerifier::new(source());
        let response = signed_response(PLATFORM_KEY, "any", NOW, "{}");

        assert!(matches!(
            verifier.verify_at(&response, NOW),
            Err(HttpError::Verification(_))
        ));
    }

    #[test]
    fn test_stale_timestamp() {
        let verifier = ResponseVerifier::new(source());
        let response = signed_response(PLATFORM_KEY, "ABC123", NOW, "{}");

        assert!(verifier.verify_at(&response, NOW + 301).is_err());
        assert!(verifier
            .clone()
            .with_max_skew(600)
            .verify_at(&response, NOW + 301)
            .is_ok());
    }

    #[test]
    fn test_extreme_timestamp_is_rejected() {
        let verifier = ResponseVerifier::new(source());

        for timestamp in [i64::MIN, i64::MAX] {
            let response = signed_response(PLATFORM_KEY, "ABC123", timestamp, "{}");
            assert!(matches!(
                verifier.verify_at(&response, NOW),
                Err(HttpError::Verification(_))
            ));
        }
    }

    #[test]
    fn test_missing_headers() {
        let verifier = ResponseVerifier::new(source());
        let response = RawResponse::new(200, HeaderMap::new(), "{}");

        let err = verifier.verify_at(&response, NOW).unwrap_err();
        assert!(err.to_string().contains(HEADER_TIMESTAMP));
    }
}
