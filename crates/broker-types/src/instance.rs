//! Service instance records and credentials

use crate::InstanceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque credential bundle handed out on bind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(BTreeMap<String, serde_json::Value>);

impl Credential {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, serde_json::Value)> for Credential {
    fn from_iter<T: IntoIterator<Item = (String, serde_json::Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A provisioned instance known to the broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Caller-supplied instance identifier
    pub id: InstanceId,

    /// Display name
    pub name: String,

    /// Credential issued for this instance
    pub credential: Credential,

    /// When the record was registered
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ServiceInstance {
    pub fn new(id: InstanceId, name: impl Into<String>, credential: Credential) -> Self {
        Self {
            id,
            name: name.into(),
            credential,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_is_a_flat_object() {
        let credential = Credential::new()
            .with("username", "admin")
            .with("port", 5432);

        let json = serde_json::to_value(&credential).unwrap();
        assert_eq!(json, serde_json::json!({"port": 5432, "username": "admin"}));
        assert_eq!(credential.len(), 2);
    }
}
