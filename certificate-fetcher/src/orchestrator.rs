//! Fetch Orchestrator
//!
//! One run: build the signed client and the store, wire the stages, send
//! a single `GET v3/certificates` and let the chain process the answer.
//! Nothing is retried.

use crate::chain::InterceptorChain;
use crate::config::{Options, CERTIFICATES_PATH};
use crate::envelope::{parse_entries, CertificateRecord};
use crate::error::Result;
use crate::stages::{CertificateInjector, CertificateRecorder, SignatureStage};
use crate::store::CertificateStore;
use signed_http::SignedHttpClient;
use std::fmt;
use std::io::{self, Write};
use tracing::{debug, info};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Init,
    Configure,
    Dispatch,
    Await,
    Success,
    Failure,
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchState::Init => "init",
            FetchState::Configure => "configure",
            FetchState::Dispatch => "dispatch",
            FetchState::Await => "await",
            FetchState::Success => "success",
            FetchState::Failure => "failure",
        };
        f.write_str(name)
    }
}

pub struct FetchOrchestrator {
    options: Options,
    state: FetchState,
}

impl FetchOrchestrator {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            state: FetchState::Init,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Fetch and print the reports to stdout
    pub async fn run(&mut self) -> Result<Vec<CertificateRecord>> {
        self.run_with_writer(io::stdout()).await
    }

    /// Fetch, writing the certificate reports to `out`
    ///
    /// Returns the certificates of the response in the order the API
    /// listed them.
    pub async fn run_with_writer<W: Write + 'static>(
        &mut self,
        out: W,
    ) -> Result<Vec<CertificateRecord>> {
        let result = self.execute(out).await;
        self.transition(if result.is_ok() {
            FetchState::Success
        } else {
            FetchState::Failure
        });
        result
    }

    async fn execute<W: Write + 'static>(&mut self, out: W) -> Result<Vec<CertificateRecord>> {
        let client = SignedHttpClient::new(self.options.client_config())?;
        let store = CertificateStore::new();

        self.transition(FetchState::Configure);
        let mut chain = InterceptorChain::builder()
            .injector(CertificateInjector::new(
                store.clone(),
                self.options.api_key.as_bytes(),
            )?)
            .verifier(SignatureStage::new(store.clone()))
            .recorder(CertificateRecorder::new(
                store.clone(),
                self.options.output_dir.clone(),
                out,
            ))
            .build()?;
        debug!(plan = ?chain.plan(), "interceptor chain configured");

        self.transition(FetchState::Dispatch);
        let url = client.url_for(CERTIFICATES_PATH)?;
        info!(url = %url, merchant_id = %self.options.merchant_id, "requesting platform certificates");
        let pending = client.get(CERTIFICATES_PATH);

        self.transition(FetchState::Await);
        let response = chain.run(pending.await?)?;

        let records = parse_entries(&response.body)?
            .iter()
            .map(|entry| entry.record(store.get(&entry.serial_no)))
            .collect::<Vec<_>>();
        info!(
            count = records.len(),
            output_dir = %self.options.output_dir.display(),
            "platform certificates downloaded"
        );
        Ok(records)
    }

    fn transition(&mut self, next: FetchState) {
        debug!(from = %self.state, to = %next, "fetch state");
        self.state = next;
    }
}
