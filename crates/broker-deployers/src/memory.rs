//! In-memory cluster
//!
//! Suitable for development and testing. Objects live in a concurrent map
//! keyed by kind, namespace and name; nothing reconciles them, so status is
//! only what callers set through [`InMemoryCluster::set_status`].

use crate::client::{ClientError, ClusterClient, Manifest, NAMESPACE_KIND};
use dashmap::DashMap;
use tracing::debug;

type ObjectKey = (String, String, String);

fn key(kind: &str, namespace: &str, name: &str) -> ObjectKey {
    (kind.to_string(), namespace.to_string(), name.to_string())
}

/// In-memory cluster client
#[derive(Debug, Default)]
pub struct InMemoryCluster {
    objects: DashMap<ObjectKey, Manifest>,

    /// Kinds whose creation is rejected, with the rejection reason
    rejected_kinds: DashMap<String, String>,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every later creation of `kind`
    pub fn reject_kind(&self, kind: impl Into<String>, reason: impl Into<String>) {
        self.rejected_kinds.insert(kind.into(), reason.into());
    }

    /// Replace the status of a stored object
    pub fn set_status(
        &self,
        kind: &str,
        namespace: &str,
        name: &str,
        status: serde_json::Value,
    ) -> Result<(), ClientError> {
        let mut object = self
            .objects
            .get_mut(&key(kind, namespace, name))
            .ok_or_else(|| not_found(kind, namespace, name))?;
        object.status = status;
        Ok(())
    }

    /// Number of stored objects of `kind` across namespaces
    pub fn count(&self, kind: &str) -> usize {
        self.objects.iter().filter(|o| o.key().0 == kind).count()
    }

    /// Objects in a namespace, in no particular order
    pub fn list_namespace(&self, namespace: &str) -> Vec<Manifest> {
        self.objects
            .iter()
            .filter(|o| o.key().1 == namespace)
            .map(|o| o.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn not_found(kind: &str, namespace: &str, name: &str) -> ClientError {
    ClientError::NotFound {
        kind: kind.to_string(),
        namespace: namespace.to_string(),
        name: name.to_string(),
    }
}

impl ClusterClient for InMemoryCluster {
    fn create(&self, manifest: &Manifest) -> Result<Manifest, ClientError> {
        if let Some(reason) = self.rejected_kinds.get(&manifest.kind) {
            return Err(ClientError::Rejected(reason.clone()));
        }

        let namespace = manifest.namespace_name();
        if !manifest.is_cluster_scoped()
            && !self
                .objects
                .contains_key(&key(NAMESPACE_KIND, "", namespace))
        {
            return Err(ClientError::NamespaceMissing(namespace.to_string()));
        }

        let object_key = key(&manifest.kind, namespace, manifest.name());
        match self.objects.entry(object_key) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(ClientError::AlreadyExists {
                kind: manifest.kind.clone(),
                namespace: namespace.to_string(),
                name: manifest.name().to_string(),
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                debug!(kind = %manifest.kind, namespace, name = manifest.name(), "Created object");
                slot.insert(manifest.clone());
                Ok(manifest.clone())
            }
        }
    }

    fn get(&self, kind: &str, namespace: &str, name: &str) -> Result<Manifest, ClientError> {
        self.objects
            .get(&key(kind, namespace, name))
            .map(|o| o.value().clone())
            .ok_or_else(|| not_found(kind, namespace, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_namespace() {
        let cluster = InMemoryCluster::new();
        let sa = Manifest::new("v1", "ServiceAccount", "operator").in_namespace("fuse-1");

        assert_eq!(
            cluster.create(&sa).unwrap_err(),
            ClientError::NamespaceMissing("fuse-1".into())
        );

        cluster.create(&Manifest::namespace("fuse-1")).unwrap();
        cluster.create(&sa).unwrap();
        assert_eq!(cluster.get("ServiceAccount", "fuse-1", "operator").unwrap(), sa);
    }

    #[test]
    fn test_duplicate_create_fails() {
        let cluster = InMemoryCluster::new();
        cluster.create(&Manifest::namespace("fuse-1")).unwrap();

        let err = cluster.create(&Manifest::namespace("fuse-1")).unwrap_err();
        assert!(matches!(err, ClientError::AlreadyExists { .. }));
        assert_eq!(cluster.count(NAMESPACE_KIND), 1);
    }

    #[test]
    fn test_rejected_kind() {
        let cluster = InMemoryCluster::new();
        cluster.reject_kind("Namespace", "quota exceeded");

        let err = cluster.create(&Manifest::namespace("fuse-1")).unwrap_err();
        assert_eq!(err, ClientError::Rejected("quota exceeded".into()));
        assert!(cluster.is_empty());
    }

    #[test]
    fn test_set_status() {
        let cluster = InMemoryCluster::new();
        cluster.create(&Manifest::namespace("ns")).unwrap();
        cluster
            .create(&Manifest::new("v1", "DeploymentConfig", "ui").in_namespace("ns"))
            .unwrap();

        cluster
            .set_status("DeploymentConfig", "ns", "ui", serde_json::json!({"replicas": 1}))
            .unwrap();
        let stored = cluster.get("DeploymentConfig", "ns", "ui").unwrap();
        assert_eq!(stored.status["replicas"], 1);

        assert!(cluster
            .set_status("DeploymentConfig", "ns", "missing", serde_json::Value::Null)
            .is_err());
    }
}
