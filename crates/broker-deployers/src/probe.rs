//! Rollout readiness probe

use crate::client::{ClientError, ClusterClient};
use broker_controller::{ProbeError, ProbeOutcome, ReadinessProbe};
use broker_types::InstanceId;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Kind of the rollout objects watched by [`RolloutProbe`]
pub const DEPLOYMENT_CONFIG_KIND: &str = "DeploymentConfig";

#[derive(Debug, Default, Deserialize)]
struct RolloutStatus {
    #[serde(default)]
    conditions: Vec<RolloutCondition>,
}

#[derive(Debug, Deserialize)]
struct RolloutCondition {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

/// Watches one rollout inside the namespace of an instance.
///
/// The rollout is ready once it reports conditions and none of them is
/// `"False"`. A rollout that does not exist yet, or has no conditions yet,
/// counts as in progress. Any other lookup failure is a probe error.
pub struct RolloutProbe {
    client: Arc<dyn ClusterClient>,
    namespace_prefix: String,
    rollout: String,
}

impl RolloutProbe {
    pub fn new(
        client: Arc<dyn ClusterClient>,
        namespace_prefix: impl Into<String>,
        rollout: impl Into<String>,
    ) -> Self {
        Self {
            client,
            namespace_prefix: namespace_prefix.into(),
            rollout: rollout.into(),
        }
    }

    fn namespace(&self, instance_id: &InstanceId) -> String {
        format!("{}{}", self.namespace_prefix, instance_id)
    }
}

impl ReadinessProbe for RolloutProbe {
    fn name(&self) -> &str {
        &self.rollout
    }

    fn check(&self, instance_id: &InstanceId) -> Result<ProbeOutcome, ProbeError> {
        let namespace = self.namespace(instance_id);
        let object = match self.client.get(DEPLOYMENT_CONFIG_KIND, &namespace, &self.rollout) {
            Ok(object) => object,
            // Created by the operator some time after provisioning
            Err(ClientError::NotFound { .. }) => {
                return Ok(ProbeOutcome::in_progress(format!(
                    "{} has not been created yet",
                    self.rollout
                )));
            }
            Err(e) => return Err(ProbeError::new(&self.rollout, e)),
        };

        let status: RolloutStatus = if object.status.is_null() {
            RolloutStatus::default()
        } else {
            serde_json::from_value(object.status)
                .map_err(|e| ProbeError::new(&self.rollout, format!("malformed status: {e}")))?
        };

        if status.conditions.is_empty() {
            return Ok(ProbeOutcome::in_progress(format!(
                "{} has not reported any conditions yet",
                self.rollout
            )));
        }

        if let Some(pending) = status.conditions.iter().find(|c| c.status == "False") {
            debug!(
                rollout = %self.rollout,
                condition = %pending.kind,
                "Rollout not yet ready"
            );
            return Ok(ProbeOutcome::in_progress(pending.message.clone()));
        }

        Ok(ProbeOutcome::ready())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Manifest;
    use crate::memory::InMemoryCluster;
    use broker_types::OperationState;
    use serde_json::json;

    fn cluster_with_rollout(status: serde_json::Value) -> Arc<InMemoryCluster> {
        let cluster = Arc::new(InMemoryCluster::new());
        cluster.create(&Manifest::namespace("fuse-i-1")).unwrap();
        cluster
            .create(
                &Manifest::new("apps.openshift.io/v1", DEPLOYMENT_CONFIG_KIND, "syndesis-ui")
                    .in_namespace("fuse-i-1"),
            )
            .unwrap();
        cluster
            .set_status(DEPLOYMENT_CONFIG_KIND, "fuse-i-1", "syndesis-ui", status)
            .unwrap();
        cluster
    }

    struct UnreachableCluster;

    impl ClusterClient for UnreachableCluster {
        fn create(&self, manifest: &Manifest) -> Result<Manifest, ClientError> {
            Ok(manifest.clone())
        }

        fn get(&self, _kind: &str, _namespace: &str, _name: &str) -> Result<Manifest, ClientError> {
            Err(ClientError::Rejected("connection refused".into()))
        }
    }

    fn probe(cluster: Arc<InMemoryCluster>) -> RolloutProbe {
        RolloutProbe::new(cluster, "fuse-", "syndesis-ui")
    }

    #[test]
    fn test_false_condition_is_in_progress() {
        let cluster = cluster_with_rollout(json!({
            "conditions": [
                {"type": "Available", "status": "True", "message": "ok"},
                {"type": "Progressing", "status": "False", "message": "replicas pending"}
            ]
        }));

        let outcome = probe(cluster).check(&InstanceId::new("i-1")).unwrap();
        assert_eq!(outcome, ProbeOutcome::in_progress("replicas pending"));
    }

    #[test]
    fn test_all_true_is_ready() {
        let cluster = cluster_with_rollout(json!({
            "conditions": [{"type": "Available", "status": "True"}]
        }));

        let outcome = probe(cluster).check(&InstanceId::new("i-1")).unwrap();
        assert_eq!(outcome.state, OperationState::Succeeded);
    }

    #[test]
    fn test_no_conditions_is_in_progress() {
        let cluster = cluster_with_rollout(serde_json::Value::Null);

        let outcome = probe(cluster).check(&InstanceId::new("i-1")).unwrap();
        assert_eq!(outcome.state, OperationState::InProgress);
    }

    #[test]
    fn test_missing_rollout_is_in_progress() {
        let cluster = Arc::new(InMemoryCluster::new());

        let outcome = probe(cluster).check(&InstanceId::new("i-1")).unwrap();
        assert_eq!(
            outcome,
            ProbeOutcome::in_progress("syndesis-ui has not been created yet")
        );
    }

    #[test]
    fn test_lookup_failure_is_probe_error() {
        let probe = RolloutProbe::new(Arc::new(UnreachableCluster), "fuse-", "syndesis-ui");

        let err = probe.check(&InstanceId::new("i-1")).unwrap_err();
        assert_eq!(err.probe, "syndesis-ui");
        assert!(err.reason.contains("connection refused"));
    }

    #[test]
    fn test_malformed_status_is_probe_error() {
        let cluster = cluster_with_rollout(json!({"conditions": "not a list"}));

        let err = probe(cluster).check(&InstanceId::new("i-1")).unwrap_err();
        assert_eq!(err.probe, "syndesis-ui");
        assert!(err.reason.contains("malformed status"));
    }

    #[test]
    fn test_targets_its_own_rollout() {
        let cluster = cluster_with_rollout(json!({
            "conditions": [{"type": "Available", "status": "True"}]
        }));
        let other = RolloutProbe::new(cluster, "fuse-", "syndesis-server");

        let outcome = other.check(&InstanceId::new("i-1")).unwrap();
        assert_eq!(outcome.state, OperationState::InProgress);
    }
}
