//! Controller configuration

use serde::{Deserialize, Serialize};

/// What to do when a deployer registers under an id already in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Last registration wins
    #[default]
    Replace,
    /// Fail the second registration
    Reject,
}

/// Controller configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Policy for duplicate deployer ids
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Delete the instance record when the instance is removed
    #[serde(default)]
    pub forget_on_remove: bool,
}

impl ControllerConfig {
    /// Reject duplicate deployers and forget removed instances
    pub fn strict() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            forget_on_remove: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_records_and_replace() {
        let config = ControllerConfig::default();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
        assert!(!config.forget_on_remove);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ControllerConfig =
            serde_json::from_str(r#"{"duplicate_policy":"reject"}"#).unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert!(!config.forget_on_remove);
    }
}
