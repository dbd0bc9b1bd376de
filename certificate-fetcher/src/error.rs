//! Error types for the certificate pipeline

use signed_http::HttpError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport or HTTP-level failure
    #[error("Network error: {message}")]
    Network {
        message: String,
        body: Option<String>,
    },

    /// An envelope failed AEAD authentication or could not be decoded
    #[error("Decryption failed for certificate {serial_no}: {reason}")]
    Decryption { serial_no: String, reason: String },

    /// The response failed its signature check
    #[error("Verification failed: {0}")]
    Verification(String),

    /// The response body has the wrong shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A serial number was written twice with different content
    #[error("Certificate {0} already loaded with different content")]
    StoreConflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Body of the HTTP response behind a network failure, if any
    pub fn response_body(&self) -> Option<&str> {
        match self {
            FetchError::Network { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Short category name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "network",
            FetchError::Decryption { .. } => "decryption",
            FetchError::Verification(_) => "verification",
            FetchError::MalformedResponse(_) => "malformed_response",
            FetchError::StoreConflict(_) => "store_conflict",
            FetchError::Config(_) => "config",
            FetchError::Io(_) => "io",
        }
    }
}

impl From<HttpError> for FetchError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Network(message) => FetchError::Network {
                message,
                body: None,
            },
            HttpError::Status { status, body } => FetchError::Network {
                message: format!("request failed with status code {}", status),
                body: Some(body),
            },
            HttpError::Verification(message) => FetchError::Verification(message),
            HttpError::Configuration(message) => FetchError::Config(message),
            HttpError::Crypto(e) => FetchError::Config(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
