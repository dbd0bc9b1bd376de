use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Invalid nonce length: expected {expected}, got {got}")]
    InvalidNonce { expected: usize, got: usize },

    #[error("Invalid encrypted data format: {0}")]
    InvalidFormat(String),

    #[error("Invalid UTF-8 in decrypted data: {0}")]
    InvalidUtf8(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(String),

    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
