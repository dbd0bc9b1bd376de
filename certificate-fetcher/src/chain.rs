//! Response Interceptor Chain
//!
//! A certificate-list response both carries the platform certificates and
//! is signed by one of them. The stages must therefore run in a fixed
//! order on every response:
//!
//! 1. [`Phase::Inject`] decrypts the envelopes into the store,
//! 2. [`Phase::Verify`] authenticates the response against that store,
//! 3. [`Phase::Record`] persists what was decrypted, now that it is trusted.
//!
//! The order is encoded in [`Phase`] rather than in registration order:
//! stages are kept sorted by phase and run front to back, stopping at the
//! first error so nothing after a failed verification ever executes.

use crate::error::{FetchError, Result};
use signed_http::RawResponse;
use std::fmt;
use tracing::{debug, warn};

/// Position of a stage on the response path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Populate the store before anything reads it
    Inject,
    /// The anchor: authenticate the response
    Verify,
    /// Act on verified data only
    Record,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Inject => write!(f, "inject"),
            Phase::Verify => write!(f, "verify"),
            Phase::Record => write!(f, "record"),
        }
    }
}

/// One response transform
///
/// Stages see the response by reference, so it reaches the next stage
/// unchanged; their effects go through the shared certificate store or the
/// filesystem.
pub trait ResponseStage {
    fn name(&self) -> &'static str;

    fn process(&mut self, response: &RawResponse) -> Result<()>;
}

struct RegisteredStage {
    phase: Phase,
    stage: Box<dyn ResponseStage>,
}

/// Ordered stages applied to every response
pub struct InterceptorChain {
    stages: Vec<RegisteredStage>,
}

impl InterceptorChain {
    pub fn builder() -> InterceptorChainBuilder {
        InterceptorChainBuilder::default()
    }

    /// `(phase, name)` in execution order
    pub fn plan(&self) -> Vec<(Phase, &'static str)> {
        self.stages
            .iter()
            .map(|registered| (registered.phase, registered.stage.name()))
            .collect()
    }

    /// Run every stage on `response` and hand it back unchanged
    pub fn run(&mut self, response: RawResponse) -> Result<RawResponse> {
        for registered in &mut self.stages {
            let name = registered.stage.name();
            debug!(phase = %registered.phase, stage = name, "running response stage");

            if let Err(err) = registered.stage.process(&response) {
                warn!(
                    phase = %registered.phase,
                    stage = name,
                    kind = err.kind(),
                    "response stage failed"
                );
                return Err(err);
            }
        }
        Ok(response)
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("plan", &self.plan())
            .finish()
    }
}

#[derive(Default)]
pub struct InterceptorChainBuilder {
    stages: Vec<RegisteredStage>,
}

impl InterceptorChainBuilder {
    /// Register `stage` in `phase`
    ///
    /// Stages of the same phase keep their registration order.
    pub fn stage(mut self, phase: Phase, stage: impl ResponseStage + 'static) -> Self {
        let at = self
            .stages
            .iter()
            .position(|registered| registered.phase > phase)
            .unwrap_or(self.stages.len());

        self.stages.insert(
            at,
            RegisteredStage {
                phase,
                stage: Box::new(stage),
            },
        );
        self
    }

    pub fn injector(self, stage: impl ResponseStage + 'static) -> Self {
        self.stage(Phase::Inject, stage)
    }

    pub fn verifier(self, stage: impl ResponseStage + 'static) -> Self {
        self.stage(Phase::Verify, stage)
    }

    pub fn recorder(self, stage: impl ResponseStage + 'static) -> Self {
        self.stage(Phase::Record, stage)
    }

    /// Finish the chain; exactly one verify stage is required
    pub fn build(self) -> Result<InterceptorChain> {
        let anchors = self
            .stages
            .iter()
            .filter(|registered| registered.phase == Phase::Verify)
            .count();

        if anchors != 1 {
            return Err(FetchError::Config(format!(
                "response chain needs exactly one verify stage, found {}",
                anchors
            )));
        }

        Ok(InterceptorChain {
            stages: self.stages,
        })
    }
}
