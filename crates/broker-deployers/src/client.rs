//! Cluster client seam
//!
//! Deployers talk to the target platform through [`ClusterClient`]. No
//! particular platform library is linked; a real client adapts its API to
//! these two calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Kind used for namespace objects
pub const NAMESPACE_KIND: &str = "Namespace";

/// Object metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,

    /// Empty for cluster-scoped objects
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// A platform object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: serde_json::Value,

    #[serde(default)]
    pub status: serde_json::Value,
}

impl Manifest {
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            metadata: ObjectMeta {
                name: name.into(),
                ..Default::default()
            },
            spec: serde_json::Value::Null,
            status: serde_json::Value::Null,
        }
    }

    /// A namespace object
    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new("v1", NAMESPACE_KIND, name)
    }

    pub fn with_spec(mut self, spec: serde_json::Value) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata.namespace = namespace.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace_name(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn is_cluster_scoped(&self) -> bool {
        self.kind == NAMESPACE_KIND
    }
}

/// Errors returned by cluster clients
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("{kind} {namespace}/{name} already exists")]
    AlreadyExists {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("Namespace {0} does not exist")]
    NamespaceMissing(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Minimal client for the target platform
pub trait ClusterClient: Send + Sync {
    /// Create an object, returning it as stored
    fn create(&self, manifest: &Manifest) -> Result<Manifest, ClientError>;

    /// Fetch an object; `namespace` is empty for cluster-scoped kinds
    fn get(&self, kind: &str, namespace: &str, name: &str) -> Result<Manifest, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_wire_shape() {
        let manifest = Manifest::new("apps.openshift.io/v1", "DeploymentConfig", "syndesis-ui")
            .in_namespace("fuse-abc")
            .with_label("app", "syndesis");

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["apiVersion"], "apps.openshift.io/v1");
        assert_eq!(json["metadata"]["namespace"], "fuse-abc");
        assert_eq!(json["metadata"]["labels"]["app"], "syndesis");
    }

    #[test]
    fn test_namespace_is_cluster_scoped() {
        let ns = Manifest::namespace("fuse-abc");
        assert!(ns.is_cluster_scoped());
        assert_eq!(ns.namespace_name(), "");
    }
}
