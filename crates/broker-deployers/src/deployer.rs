//! Manifest-driven deployer

use crate::client::{ClusterClient, Manifest};
use crate::definition::{DashboardSource, DeployerDefinition};
use crate::probe::RolloutProbe;
use crate::template::TemplateVars;
use broker_controller::{
    Deployer, DeployerError, DeployerResult, OperationReport, ProvisionContext, StatusAggregator,
    PROVISION_OPERATION,
};
use broker_types::{
    CreateServiceInstanceResponse, Credential, DeployerId, InstanceId, Service, ServiceId,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Kind of the route object used to discover the router suffix
pub const ROUTE_KIND: &str = "Route";

/// Label put on every namespace created by a manifest deployer
pub const MANAGED_BY_LABEL: &str = "managed-services-broker/deployer";

/// Deploys a [`DeployerDefinition`] through a [`ClusterClient`].
///
/// Provisioning creates the instance namespace and then every template
/// in order. The first failing step aborts provisioning; objects created
/// by earlier steps are left in place.
pub struct ManifestDeployer {
    definition: DeployerDefinition,
    client: Arc<dyn ClusterClient>,
}

impl ManifestDeployer {
    pub fn new(definition: DeployerDefinition, client: Arc<dyn ClusterClient>) -> Self {
        Self { definition, client }
    }

    pub fn definition(&self) -> &DeployerDefinition {
        &self.definition
    }

    fn step_name(&self, what: &str) -> String {
        format!("{what} for {} service", self.definition.display_name)
    }

    fn validate(&self, context: &ProvisionContext) -> DeployerResult<()> {
        let missing: Vec<&str> = self
            .definition
            .required_parameters
            .iter()
            .filter(|name| context.parameter_str(name).is_none())
            .map(String::as_str)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DeployerError::step(
                self.step_name("validate parameters"),
                format!("missing required parameters: {}", missing.join(", ")),
            ))
        }
    }

    fn dashboard_host(&self, namespace: &str) -> DeployerResult<Option<String>> {
        match &self.definition.dashboard {
            DashboardSource::None => Ok(None),
            DashboardSource::Suffix(suffix) => Ok(Some(format!("{namespace}.{suffix}"))),
            DashboardSource::Route {
                namespace: route_namespace,
                name,
            } => {
                let step = self.step_name("get dashboard url");
                let route = self
                    .client
                    .get(ROUTE_KIND, route_namespace, name)
                    .map_err(|e| DeployerError::step(&step, e))?;

                let host = route.spec["host"].as_str().ok_or_else(|| {
                    DeployerError::step(&step, format!("route {name} has no host"))
                })?;
                let suffix = router_suffix(host, name, route_namespace);
                Ok(Some(format!("{namespace}{suffix}")))
            }
        }
    }
}

/// Router suffix of a route host, e.g. `.apps.example.com` for
/// `registry-console-default.apps.example.com`
fn router_suffix<'a>(host: &'a str, name: &str, namespace: &str) -> &'a str {
    let prefix = format!("{name}-{namespace}");
    host.strip_prefix(prefix.as_str())
        .or_else(|| host.find('.').map(|dot| &host[dot..]))
        .unwrap_or("")
}

impl Deployer for ManifestDeployer {
    fn id(&self) -> &DeployerId {
        &self.definition.id
    }

    fn responsible_for(&self, service_id: &ServiceId) -> bool {
        self.definition.owns(service_id)
    }

    fn catalog_entries(&self) -> Vec<Service> {
        self.definition.catalog.clone()
    }

    #[instrument(skip(self, context), fields(deployer = %self.definition.id))]
    fn provision(
        &self,
        instance_id: &InstanceId,
        context: &ProvisionContext,
    ) -> DeployerResult<CreateServiceInstanceResponse> {
        info!("Deploying {}", self.definition.display_name);
        self.validate(context)?;

        let namespace = self.definition.namespace_for(instance_id.as_str());
        let namespace_object = Manifest::namespace(&namespace)
            .with_label(MANAGED_BY_LABEL, self.definition.id.as_str());
        self.client.create(&namespace_object).map_err(|e| {
            warn!(namespace = %namespace, error = %e, "Namespace creation failed");
            DeployerError::step(self.step_name("create namespace"), e)
        })?;

        let dashboard_host = self.dashboard_host(&namespace)?;
        let vars = TemplateVars {
            instance_id: instance_id.as_str(),
            namespace: &namespace,
            user_namespace: &context.context_profile.namespace,
            dashboard_host: dashboard_host.as_deref(),
            parameters: &context.parameters,
        };

        for template in &self.definition.templates {
            let manifest = template.render(&vars);
            self.client.create(&manifest).map_err(|e| {
                warn!(step = %template.step, error = %e, "Provisioning step failed");
                DeployerError::step(&template.step, e)
            })?;
        }

        let mut credential = Credential::new().with("namespace", namespace.as_str());
        let mut response =
            CreateServiceInstanceResponse::accepted().with_operation(PROVISION_OPERATION);
        if let Some(host) = dashboard_host {
            let url = format!("https://{host}");
            credential = credential.with("dashboard_url", url.as_str());
            response = response.with_dashboard_url(url);
        }

        info!(
            namespace = %namespace,
            objects = self.definition.templates.len() + 1,
            "Provisioning started"
        );
        Ok(response.with_credential(credential))
    }

    fn poll_status(
        &self,
        instance_id: &InstanceId,
        _context: &ProvisionContext,
    ) -> DeployerResult<OperationReport> {
        let mut aggregator = StatusAggregator::new(format!(
            "{} deployed successfully",
            self.definition.display_name
        ));
        for rollout in &self.definition.rollouts {
            aggregator.add_probe(Box::new(RolloutProbe::new(
                self.client.clone(),
                self.definition.namespace_prefix.clone(),
                rollout.clone(),
            )));
        }

        Ok(aggregator.evaluate(instance_id))
    }
}
