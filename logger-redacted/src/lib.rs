//! Logging setup for the certificate fetcher with secret redaction
//!
//! Debug traces of signed requests would otherwise leak credentials: the
//! `Authorization` header carries a fresh signature, and configuration dumps
//! may contain the API key or the merchant private key. [`SecretRedactor`]
//! masks all three before text reaches a subscriber.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{LoggerConfig, SecretRedactor};
//!
//! let redactor = SecretRedactor::default().with_secret("0123456789abcdef0123456789abcdef");
//! let line = redactor.redact(r#"Authorization: WECHATPAY2-SHA256-RSA2048 signature="abc""#);
//! assert!(!line.contains(r#""abc""#));
//!
//! let config = LoggerConfig::new(true);
//! assert!(config.default_directives().contains("debug"));
//! ```

pub mod config;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use redactor::*;
pub use subscriber::*;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}
