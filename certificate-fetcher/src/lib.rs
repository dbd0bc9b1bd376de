//! Platform certificate downloader
//!
//! Fetches the payment platform's rotating certificates over the signed
//! API, decrypts each envelope with the merchant's API key, verifies the
//! very response that carried them and saves the certificates as PEM files.
//!
//! The response path is an [`InterceptorChain`] of three stages sharing one
//! [`CertificateStore`]:
//!
//! - [`stages::CertificateInjector`] decrypts every entry into the store,
//! - [`stages::SignatureStage`] checks the response signature against it,
//! - [`stages::CertificateRecorder`] writes the files and prints a report.
//!
//! [`FetchOrchestrator`] wires the stages and issues the single request.

pub mod chain;
pub mod cli;
pub mod config;
pub mod envelope;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod stages;
pub mod store;

pub use chain::{InterceptorChain, Phase, ResponseStage};
pub use cli::Cli;
pub use config::{Options, CERTIFICATES_PATH, DEFAULT_BASE_URI};
pub use envelope::{CertificateEntry, CertificateRecord, EncryptedEnvelope};
pub use error::{FetchError, Result};
pub use orchestrator::{FetchOrchestrator, FetchState};
pub use store::{CertificateStore, PLACEHOLDER_SERIAL};
