//! The deployer contract
//!
//! A deployer owns the provisioning logic for one family of managed
//! services. New backend kinds are added by implementing [`Deployer`] and
//! registering an instance with the controller; the controller itself never
//! changes.

use crate::error::{DeployerError, DeployerResult};
use crate::status::OperationReport;
use broker_types::{
    ContextProfile, CreateServiceInstanceRequest, CreateServiceInstanceResponse, DeployerId,
    InstanceId, PlanId, Service, ServiceId,
};

/// What a deployer gets to know about the instance it works on
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionContext {
    pub service_id: ServiceId,
    pub plan_id: PlanId,

    /// Platform context of the requesting user
    pub context_profile: ContextProfile,

    /// User supplied parameters
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

impl ProvisionContext {
    pub fn from_request(request: &CreateServiceInstanceRequest) -> Self {
        Self {
            service_id: request.service_id.clone(),
            plan_id: request.plan_id.clone(),
            context_profile: request.context.clone(),
            parameters: request.parameters.clone(),
        }
    }

    /// Context for calls that only know the service and plan, such as polls
    pub fn for_service(service_id: ServiceId, plan_id: PlanId) -> Self {
        Self {
            service_id,
            plan_id,
            context_profile: ContextProfile::default(),
            parameters: serde_json::Map::new(),
        }
    }

    pub fn parameter_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(|v| v.as_str())
    }
}

/// Provisioning logic for one family of managed services
///
/// Implementations must be safe to call from many request threads at once.
/// Every call is synchronous from the controller's point of view.
pub trait Deployer: Send + Sync {
    /// Stable identity, used as the registry key
    fn id(&self) -> &DeployerId;

    /// Whether this deployer provisions the given service.
    ///
    /// Must be pure: no side effects, same answer for the same input.
    fn responsible_for(&self, service_id: &ServiceId) -> bool;

    /// Catalog entries offered by this deployer
    fn catalog_entries(&self) -> Vec<Service>;

    /// Create every resource backing a new instance.
    ///
    /// On success returns an accepted-style response, optionally with a
    /// dashboard URL and a credential. Errors are final; the controller
    /// does not retry.
    fn provision(
        &self,
        instance_id: &InstanceId,
        context: &ProvisionContext,
    ) -> DeployerResult<CreateServiceInstanceResponse>;

    /// Report the state of the asynchronous provisioning of an instance.
    fn poll_status(
        &self,
        instance_id: &InstanceId,
        context: &ProvisionContext,
    ) -> DeployerResult<OperationReport> {
        let _ = (instance_id, context);
        Err(DeployerError::Unsupported("poll status"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare {
        id: DeployerId,
    }

    impl Deployer for Bare {
        fn id(&self) -> &DeployerId {
            &self.id
        }

        fn responsible_for(&self, service_id: &ServiceId) -> bool {
            service_id.as_str() == "bare"
        }

        fn catalog_entries(&self) -> Vec<Service> {
            Vec::new()
        }

        fn provision(
            &self,
            _instance_id: &InstanceId,
            _context: &ProvisionContext,
        ) -> DeployerResult<CreateServiceInstanceResponse> {
            Ok(CreateServiceInstanceResponse::accepted())
        }
    }

    #[test]
    fn test_poll_status_is_unsupported_by_default() {
        let deployer = Bare {
            id: DeployerId::new("bare"),
        };
        let context = ProvisionContext::for_service(ServiceId::new("bare"), PlanId::new("p"));

        let err = deployer
            .poll_status(&InstanceId::new("i-1"), &context)
            .unwrap_err();
        assert_eq!(err, DeployerError::Unsupported("poll status"));
    }

    #[test]
    fn test_context_from_request() {
        let request = CreateServiceInstanceRequest::new("fuse-service-id", "default-fuse")
            .with_parameter("GITHUB_CLIENT_ID", "abc")
            .with_context(ContextProfile {
                platform: "kubernetes".into(),
                namespace: "team-a".into(),
            });

        let context = ProvisionContext::from_request(&request);
        assert_eq!(context.parameter_str("GITHUB_CLIENT_ID"), Some("abc"));
        assert_eq!(context.parameter_str("missing"), None);
        assert_eq!(context.context_profile.namespace, "team-a");
    }
}
