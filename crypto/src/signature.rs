//! RSA PKCS#1 v1.5 / SHA-256 signatures
//!
//! Requests are signed with the merchant private key; responses are
//! verified against the public key of a platform certificate. Signatures
//! travel base64-encoded in HTTP headers.

use crate::certificate::CertificateInfo;
use crate::error::{CryptoError, CryptoResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

/// Signs messages with an RSA private key
#[derive(Clone)]
pub struct RsaSigner {
    key: SigningKey<Sha256>,
}

impl RsaSigner {
    /// Load a PKCS#8 (`PRIVATE KEY`) or PKCS#1 (`RSA PRIVATE KEY`) PEM
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| CryptoError::InvalidKey(format!("RSA private key: {}", e)))?;

        Ok(Self {
            key: SigningKey::<Sha256>::new(private_key),
        })
    }

    /// Sign `message`, returning the base64 signature
    pub fn sign_base64(&self, message: &[u8]) -> CryptoResult<String> {
        let signature = self
            .key
            .try_sign(message)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        Ok(BASE64.encode(signature.to_bytes()))
    }
}

impl std::fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaSigner").finish_non_exhaustive()
    }
}

/// Verifies signatures against an RSA public key
#[derive(Debug, Clone)]
pub struct RsaVerifier {
    key: VerifyingKey<Sha256>,
}

impl RsaVerifier {
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self {
            key: VerifyingKey::<Sha256>::new(public_key),
        }
    }

    /// Use the public key embedded in a PEM certificate
    pub fn from_certificate_pem(pem: &str) -> CryptoResult<Self> {
        let info = CertificateInfo::from_pem(pem)?;
        Self::from_spki_der(info.public_key_der())
    }

    /// Use a DER SubjectPublicKeyInfo
    pub fn from_spki_der(der: &[u8]) -> CryptoResult<Self> {
        let public_key = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("RSA public key: {}", e)))?;

        Ok(Self::new(public_key))
    }

    /// Check a base64 signature over `message`
    pub fn verify_base64(&self, message: &[u8], signature_b64: &str) -> CryptoResult<()> {
        let raw = BASE64.decode(signature_b64.trim()).map_err(|e| {
            CryptoError::SignatureVerificationFailed(format!("Base64 decode error: {}", e))
        })?;

        let signature = Signature::try_from(raw.as_slice())
            .map_err(|e| CryptoError::SignatureVerificationFailed(e.to_string()))?;

        self.key
            .verify(message, &signature)
            .map_err(|_| CryptoError::SignatureVerificationFailed("signature mismatch".to_string()))
    }
}
