//! Inbound lifecycle requests

use crate::{PlanId, ServiceId};
use serde::{Deserialize, Serialize};

/// Platform context sent along with a provisioning request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextProfile {
    /// Platform issuing the request (e.g. "kubernetes")
    #[serde(default)]
    pub platform: String,

    /// Namespace of the requesting user
    #[serde(default)]
    pub namespace: String,
}

/// Request to provision a new service instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceInstanceRequest {
    pub service_id: ServiceId,
    pub plan_id: PlanId,

    #[serde(default)]
    pub organization_guid: String,

    #[serde(default)]
    pub space_guid: String,

    /// User supplied parameters, validated by the deployer
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,

    /// Whether the platform supports asynchronous provisioning
    #[serde(default)]
    pub accepts_incomplete: bool,

    #[serde(default)]
    pub context: ContextProfile,
}

impl CreateServiceInstanceRequest {
    pub fn new(service_id: impl Into<String>, plan_id: impl Into<String>) -> Self {
        Self {
            service_id: ServiceId::new(service_id),
            plan_id: PlanId::new(plan_id),
            organization_guid: String::new(),
            space_guid: String::new(),
            parameters: serde_json::Map::new(),
            accepts_incomplete: true,
            context: ContextProfile::default(),
        }
    }

    pub fn with_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_context(mut self, context: ContextProfile) -> Self {
        self.context = context;
        self
    }
}

/// Request to bind an existing instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingRequest {
    pub service_id: ServiceId,
    pub plan_id: PlanId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,

    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

impl BindingRequest {
    pub fn new(service_id: impl Into<String>, plan_id: impl Into<String>) -> Self {
        Self {
            service_id: ServiceId::new(service_id),
            plan_id: PlanId::new(plan_id),
            app_guid: None,
            parameters: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_create_request() {
        let req: CreateServiceInstanceRequest =
            serde_json::from_str(r#"{"service_id":"fuse-service-id","plan_id":"default-fuse"}"#)
                .unwrap();

        assert_eq!(req.service_id.as_str(), "fuse-service-id");
        assert!(req.parameters.is_empty());
        assert!(!req.accepts_incomplete);
        assert_eq!(req.context, ContextProfile::default());
    }

    #[test]
    fn test_context_profile_is_parsed() {
        let req: CreateServiceInstanceRequest = serde_json::from_str(
            r#"{"service_id":"s","plan_id":"p",
                "context":{"platform":"kubernetes","namespace":"team-a"}}"#,
        )
        .unwrap();

        assert_eq!(req.context.platform, "kubernetes");
        assert_eq!(req.context.namespace, "team-a");
    }
}
