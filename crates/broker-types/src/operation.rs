//! Asynchronous operation state
//!
//! Provisioning is observed by polling. Each poll recomputes the state from
//! live probes; nothing here is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// State of an asynchronous operation
///
/// `InProgress` is the implicit initial state. `Succeeded` and `Failed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperationState {
    #[default]
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "succeeded")]
    Succeeded,
    #[serde(rename = "failed")]
    Failed,
}

impl OperationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationState::Succeeded | OperationState::Failed)
    }

    /// Protocol spelling of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationState::InProgress => "in progress",
            OperationState::Succeeded => "succeeded",
            OperationState::Failed => "failed",
        }
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operation state: {0}")]
pub struct ParseOperationStateError(String);

impl FromStr for OperationState {
    type Err = ParseOperationStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in progress" => Ok(OperationState::InProgress),
            "succeeded" => Ok(OperationState::Succeeded),
            "failed" => Ok(OperationState::Failed),
            other => Err(ParseOperationStateError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!OperationState::InProgress.is_terminal());
        assert!(OperationState::Succeeded.is_terminal());
        assert!(OperationState::Failed.is_terminal());
        assert_eq!(OperationState::default(), OperationState::InProgress);
    }

    #[test]
    fn test_protocol_spelling() {
        assert_eq!(
            serde_json::to_string(&OperationState::InProgress).unwrap(),
            "\"in progress\""
        );
        assert_eq!(
            "succeeded".parse::<OperationState>().unwrap(),
            OperationState::Succeeded
        );
        assert!("done".parse::<OperationState>().is_err());
    }
}
