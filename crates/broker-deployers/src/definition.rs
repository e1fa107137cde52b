//! Declarative deployer definitions
//!
//! A [`DeployerDefinition`] is the data half of a manifest-driven deployer:
//! which services it owns, what it puts in the catalog and which objects it
//! creates, in order, for each new instance.

use crate::template::ManifestTemplate;
use broker_types::{DeployerId, Service, ServiceId};

/// Where the dashboard host of a new instance comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DashboardSource {
    /// No dashboard
    #[default]
    None,

    /// `<namespace>.<suffix>`
    Suffix(String),

    /// Derive the router suffix from an existing route: the host of
    /// `namespace/name` with its leading `<name>-<namespace>` removed
    Route { namespace: String, name: String },
}

/// Everything a [`ManifestDeployer`](crate::ManifestDeployer) needs to know
/// about one service family
#[derive(Debug, Clone)]
pub struct DeployerDefinition {
    pub id: DeployerId,

    /// Human readable name used in status descriptions
    pub display_name: String,

    /// Services this deployer is responsible for
    pub service_ids: Vec<ServiceId>,

    pub catalog: Vec<Service>,

    /// Instance namespaces are named `<prefix><instance_id>`
    pub namespace_prefix: String,

    /// Parameters that must be present as strings on provisioning
    pub required_parameters: Vec<String>,

    /// Objects created after the namespace, in order
    pub templates: Vec<ManifestTemplate>,

    /// Rollouts watched when polling, in order
    pub rollouts: Vec<String>,

    pub dashboard: DashboardSource,
}

impl DeployerDefinition {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            id: DeployerId::new(id),
            namespace_prefix: format!("{display_name}-"),
            display_name,
            service_ids: Vec::new(),
            catalog: Vec::new(),
            required_parameters: Vec::new(),
            templates: Vec::new(),
            rollouts: Vec::new(),
            dashboard: DashboardSource::None,
        }
    }

    /// Add a catalog entry and claim its service id
    pub fn with_service(mut self, service: Service) -> Self {
        self.service_ids.push(service.id.clone());
        self.catalog.push(service);
        self
    }

    pub fn with_namespace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace_prefix = prefix.into();
        self
    }

    pub fn with_required_parameter(mut self, name: impl Into<String>) -> Self {
        self.required_parameters.push(name.into());
        self
    }

    pub fn with_template(mut self, template: ManifestTemplate) -> Self {
        self.templates.push(template);
        self
    }

    pub fn with_rollout(mut self, rollout: impl Into<String>) -> Self {
        self.rollouts.push(rollout.into());
        self
    }

    pub fn with_dashboard(mut self, dashboard: DashboardSource) -> Self {
        self.dashboard = dashboard;
        self
    }

    /// Namespace holding the objects of `instance_id`
    pub fn namespace_for(&self, instance_id: &str) -> String {
        format!("{}{}", self.namespace_prefix, instance_id)
    }

    pub fn owns(&self, service_id: &ServiceId) -> bool {
        self.service_ids.contains(service_id)
    }
}
