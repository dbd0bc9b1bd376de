//! The three stages of the certificate response path

pub mod injector;
pub mod recorder;
pub mod verifier;

pub use injector::CertificateInjector;
pub use recorder::{certificate_path, CertificateRecorder};
pub use verifier::SignatureStage;
