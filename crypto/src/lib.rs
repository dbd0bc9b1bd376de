//! Cryptographic primitives for the platform certificate fetcher
//!
//! - AES-256-GCM envelope decryption keyed by the API's shared secret
//! - RSA-SHA256 request signing and response signature verification
//! - X.509 inspection of platform certificates (serial, validity, public key)

pub mod aes_gcm;
pub mod certificate;
pub mod error;
pub mod signature;

pub use aes_gcm::{decrypt, Aes256GcmDecryptor};
pub use certificate::CertificateInfo;
pub use error::*;
pub use signature::{RsaSigner, RsaVerifier};
