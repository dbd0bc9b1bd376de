use crate::chain::ResponseStage;
use crate::error::{FetchError, Result};
use crate::store::CertificateStore;
use signed_http::{HttpError, RawResponse, ResponseVerifier};

/// Adapts the signed client's response verifier to the chain
pub struct SignatureStage {
    verifier: ResponseVerifier<CertificateStore>,
}

impl SignatureStage {
    pub fn new(store: CertificateStore) -> Self {
        Self::with_verifier(ResponseVerifier::new(store))
    }

    pub fn with_verifier(verifier: ResponseVerifier<CertificateStore>) -> Self {
        Self { verifier }
    }
}

impl ResponseStage for SignatureStage {
    fn name(&self) -> &'static str {
        "verifier"
    }

    fn process(&mut self, response: &RawResponse) -> Result<()> {
        self.verifier.verify(response).map_err(|err| match err {
            HttpError::Verification(message) => FetchError::Verification(message),
            other => FetchError::from(other),
        })
    }
}
