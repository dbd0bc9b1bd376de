//! Signed HTTP client for the payment platform API v3
//!
//! Requests are authenticated with the merchant's RSA key
//! ([`RequestSigner`]); responses are authenticated against platform
//! certificates supplied by a [`CertificateSource`] ([`ResponseVerifier`]).
//! The client itself only moves bytes. Deciding when to verify is left to
//! the caller's response pipeline.

pub mod client;
pub mod error;
pub mod response;
pub mod signer;
pub mod verifier;

pub use client::{ClientConfig, SignedHttpClient};
pub use error::{HttpError, Result};
pub use response::RawResponse;
pub use reqwest::header::{HeaderMap, HeaderValue};
pub use signer::RequestSigner;
pub use verifier::{CertificateSource, ResponseVerifier};
