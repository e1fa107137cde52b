//! Asynchronous operation status aggregation
//!
//! A deployer knows which underlying resources make up an instance. Each is
//! checked by a [`ReadinessProbe`]; the [`StatusAggregator`] folds the probes
//! into a single operation state.
//!
//! Probes run in a fixed order and the first one that is not `Succeeded`
//! decides the result, so readiness is reported as of the first unready
//! dependency. A probe that cannot query its resource at all yields
//! `Failed` with the error attached; it is not retried.
//!
//! The aggregator keeps no state between polls. Polling again after a
//! terminal result returns the same result as long as the probes do.

use crate::error::ProbeError;
use broker_types::{InstanceId, LastOperationResponse, OperationState};
use tracing::{debug, warn};

/// What a single probe observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub state: OperationState,
    pub description: String,
}

impl ProbeOutcome {
    pub fn ready() -> Self {
        Self {
            state: OperationState::Succeeded,
            description: String::new(),
        }
    }

    pub fn in_progress(description: impl Into<String>) -> Self {
        Self {
            state: OperationState::InProgress,
            description: description.into(),
        }
    }

    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            state: OperationState::Failed,
            description: description.into(),
        }
    }
}

/// A readiness check against one underlying resource
pub trait ReadinessProbe: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    /// Check the resource backing `instance_id`
    fn check(&self, instance_id: &InstanceId) -> Result<ProbeOutcome, ProbeError>;
}

/// Probe backed by a closure
pub struct FnProbe<F> {
    name: String,
    check_fn: F,
}

impl<F> FnProbe<F>
where
    F: Fn(&InstanceId) -> Result<ProbeOutcome, ProbeError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, check_fn: F) -> Self {
        Self {
            name: name.into(),
            check_fn,
        }
    }
}

impl<F> ReadinessProbe for FnProbe<F>
where
    F: Fn(&InstanceId) -> Result<ProbeOutcome, ProbeError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, instance_id: &InstanceId) -> Result<ProbeOutcome, ProbeError> {
        (self.check_fn)(instance_id)
    }
}

/// Aggregate status of an asynchronous operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub state: OperationState,
    pub description: String,

    /// Set when a probe could not query its resource
    pub cause: Option<ProbeError>,
}

impl OperationReport {
    pub fn succeeded(description: impl Into<String>) -> Self {
        Self {
            state: OperationState::Succeeded,
            description: description.into(),
            cause: None,
        }
    }

    pub fn in_progress(description: impl Into<String>) -> Self {
        Self {
            state: OperationState::InProgress,
            description: description.into(),
            cause: None,
        }
    }

    /// Failed because a probe errored
    pub fn probe_failed(cause: ProbeError) -> Self {
        Self {
            state: OperationState::Failed,
            description: cause.to_string(),
            cause: Some(cause),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn to_response(&self) -> LastOperationResponse {
        LastOperationResponse::new(self.state, self.description.clone())
    }
}

impl From<ProbeOutcome> for OperationReport {
    fn from(outcome: ProbeOutcome) -> Self {
        Self {
            state: outcome.state,
            description: outcome.description,
            cause: None,
        }
    }
}

/// Ordered, fail-fast aggregation of readiness probes
pub struct StatusAggregator {
    probes: Vec<Box<dyn ReadinessProbe>>,
    success_description: String,
}

impl StatusAggregator {
    /// `success_description` is reported once every probe succeeds
    pub fn new(success_description: impl Into<String>) -> Self {
        Self {
            probes: Vec::new(),
            success_description: success_description.into(),
        }
    }

    /// Append a probe; probes are evaluated in insertion order
    pub fn with_probe(mut self, probe: Box<dyn ReadinessProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn add_probe(&mut self, probe: Box<dyn ReadinessProbe>) {
        self.probes.push(probe);
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Evaluate the probes against an instance.
    ///
    /// An aggregator without probes reports `Succeeded`.
    pub fn evaluate(&self, instance_id: &InstanceId) -> OperationReport {
        for probe in &self.probes {
            match probe.check(instance_id) {
                Ok(outcome) if outcome.state == OperationState::Succeeded => {
                    debug!(instance_id = %instance_id, probe = probe.name(), "Probe ready");
                }
                Ok(outcome) => {
                    debug!(
                        instance_id = %instance_id,
                        probe = probe.name(),
                        state = %outcome.state,
                        "Probe not ready"
                    );
                    return outcome.into();
                }
                Err(err) => {
                    warn!(
                        instance_id = %instance_id,
                        probe = probe.name(),
                        error = %err,
                        "Probe lookup failed"
                    );
                    return OperationReport::probe_failed(err);
                }
            }
        }

        OperationReport::succeeded(self.success_description.clone())
    }
}
