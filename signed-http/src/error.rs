//! Error types for the signed HTTP client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    /// Transport-level failure, no HTTP response available
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("HTTP status {status}")]
    Status { status: u16, body: String },

    /// The response failed signature authentication
    #[error("Response verification failed: {0}")]
    Verification(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] crypto::CryptoError),
}

impl HttpError {
    /// Body of the HTTP response that caused the error, if any
    pub fn response_body(&self) -> Option<&str> {
        match self {
            HttpError::Status { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        HttpError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HttpError>;
