//! Controller error types

use broker_types::{DeployerId, InstanceId, ServiceId};
use thiserror::Error;

/// Errors surfaced by the provisioning controller
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("No such instance with ID {0}")]
    NoSuchInstance(InstanceId),

    #[error("No deployer found for service {0}")]
    NoMatchingDeployer(ServiceId),

    #[error("Unimplemented: {0}")]
    Unimplemented(&'static str),

    /// A deployer's provisioning or poll call failed
    #[error("Deployer {deployer} failed: {source}")]
    Delegated {
        deployer: DeployerId,
        #[source]
        source: DeployerError,
    },

    #[error("Deployer already registered: {0}")]
    DuplicateDeployer(DeployerId),

    #[error("Instance store lock poisoned")]
    Lock,
}

impl BrokerError {
    /// Status code hint for the transport layer
    pub fn status_code(&self) -> u16 {
        match self {
            BrokerError::NoSuchInstance(_) => 404,
            BrokerError::DuplicateDeployer(_) => 409,
            BrokerError::Unimplemented(_) => 501,
            BrokerError::NoMatchingDeployer(_)
            | BrokerError::Delegated { .. }
            | BrokerError::Lock => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BrokerError::NoSuchInstance(_))
    }
}

/// Errors returned by deployers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployerError {
    /// A provisioning step failed; later steps were not attempted
    #[error("Failed to {step}: {reason}")]
    Step { step: String, reason: String },

    #[error("Operation not supported by deployer: {0}")]
    Unsupported(&'static str),
}

impl DeployerError {
    pub fn step(step: impl Into<String>, reason: impl ToString) -> Self {
        Self::Step {
            step: step.into(),
            reason: reason.to_string(),
        }
    }

    /// Name of the failing step, if any
    pub fn failed_step(&self) -> Option<&str> {
        match self {
            DeployerError::Step { step, .. } => Some(step),
            DeployerError::Unsupported(_) => None,
        }
    }
}

/// A readiness probe could not query its resource at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to get status of {probe}: {reason}")]
pub struct ProbeError {
    pub probe: String,
    pub reason: String,
}

impl ProbeError {
    pub fn new(probe: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            probe: probe.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, BrokerError>;

/// Result type for deployer calls
pub type DeployerResult<T> = std::result::Result<T, DeployerError>;
