//! Provisioning controller
//!
//! The façade implementing the broker lifecycle. It looks up the deployer
//! responsible for a request, delegates the work, and mediates every access
//! to the instance store. It creates no resources itself.

use crate::config::ControllerConfig;
use crate::deployer::{Deployer, ProvisionContext};
use crate::error::{BrokerError, DeployerError, Result};
use crate::registry::DeployerRegistry;
use crate::status::OperationReport;
use crate::store::InstanceStore;
use broker_types::{
    BindingId, BindingRequest, Catalog, CreateServiceBindingResponse,
    CreateServiceInstanceRequest, CreateServiceInstanceResponse, Credential,
    DeleteServiceInstanceResponse, InstanceId, LastOperationResponse, PlanId, ServiceId,
    ServiceInstance,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Operation token reported when provisioning could not be dispatched
pub const PROVISION_OPERATION: &str = "provision";

/// Broker lifecycle façade
///
/// Deployers are registered through `&mut self` before the controller is
/// shared; every lifecycle operation takes `&self` and may run concurrently.
pub struct ProvisioningController {
    config: ControllerConfig,
    registry: DeployerRegistry,
    store: InstanceStore,
}

impl ProvisioningController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            registry: DeployerRegistry::new(config.duplicate_policy),
            store: InstanceStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn registry(&self) -> &DeployerRegistry {
        &self.registry
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    /// Register a deployer under its own id
    pub fn register_deployer(&mut self, deployer: Arc<dyn Deployer>) -> Result<()> {
        info!(deployer = %deployer.id(), "Registering deployer");
        self.registry.register(deployer)
    }

    /// Combined catalog of every registered deployer
    #[instrument(skip(self))]
    pub fn catalog(&self) -> Catalog {
        let catalog = self.registry.catalog();
        info!(services = catalog.services.len(), "Catalog()");
        catalog
    }

    /// Provision a new instance through the responsible deployer.
    ///
    /// An unclaimed service id yields an internal-error-coded response
    /// rather than an error, so the protocol layer can still answer.
    #[instrument(skip(self, request), fields(service_id = %request.service_id))]
    pub fn create_service_instance(
        &self,
        instance_id: &InstanceId,
        request: &CreateServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse> {
        let deployer = match self.registry.dispatch(&request.service_id) {
            Ok(deployer) => deployer,
            Err(err) => {
                warn!(error = %err, "No deployer for provisioning request");
                return Ok(CreateServiceInstanceResponse::internal_error(
                    PROVISION_OPERATION,
                ));
            }
        };

        info!(deployer = %deployer.id(), "Dispatching provisioning request");
        let context = ProvisionContext::from_request(request);
        let response = deployer
            .provision(instance_id, &context)
            .map_err(|source| delegated(deployer.as_ref(), source))?;

        if let Some(credential) = &response.credential {
            let name = service_name(deployer.as_ref(), &request.service_id);
            self.store.put(ServiceInstance::new(
                instance_id.clone(),
                name,
                credential.clone(),
            ))?;
        }

        Ok(response)
    }

    /// Generic last-operation path.
    ///
    /// Not supported at this layer; polling goes through
    /// [`poll_instance`](Self::poll_instance), which asks the deployer.
    #[instrument(skip(self))]
    pub fn get_service_instance_last_operation(
        &self,
        instance_id: &InstanceId,
        service_id: &ServiceId,
        plan_id: &PlanId,
        operation: Option<&str>,
    ) -> Result<LastOperationResponse> {
        info!("GetServiceInstanceLastOperation()");
        Err(BrokerError::Unimplemented("last operation"))
    }

    /// Ask the responsible deployer for the state of an instance
    #[instrument(skip(self))]
    pub fn poll_instance(
        &self,
        instance_id: &InstanceId,
        service_id: &ServiceId,
        plan_id: &PlanId,
    ) -> Result<OperationReport> {
        let deployer = self.registry.dispatch(service_id)?;
        let context = ProvisionContext::for_service(service_id.clone(), plan_id.clone());

        let report = deployer
            .poll_status(instance_id, &context)
            .map_err(|source| delegated(deployer.as_ref(), source))?;

        if let Some(cause) = &report.cause {
            warn!(error = %cause, "Instance status could not be determined");
        }
        Ok(report)
    }

    /// Remove an instance. Teardown belongs to the deployer; this layer
    /// only forgets the record when configured to.
    #[instrument(skip(self))]
    pub fn remove_service_instance(
        &self,
        instance_id: &InstanceId,
        service_id: &ServiceId,
        plan_id: &PlanId,
        accepts_incomplete: bool,
    ) -> Result<DeleteServiceInstanceResponse> {
        info!("RemoveServiceInstance()");
        if self.config.forget_on_remove && self.store.delete(instance_id)?.is_some() {
            info!("Forgot instance record");
        }
        Ok(DeleteServiceInstanceResponse::default())
    }

    /// Hand out the stored credential of an instance
    #[instrument(skip(self))]
    pub fn bind(
        &self,
        instance_id: &InstanceId,
        binding_id: &BindingId,
        request: &BindingRequest,
    ) -> Result<CreateServiceBindingResponse> {
        info!("Bind()");
        let credentials = self.store.credential(instance_id)?;
        Ok(CreateServiceBindingResponse { credentials })
    }

    /// Bindings are not persisted, so there is nothing to release
    #[instrument(skip(self))]
    pub fn unbind(
        &self,
        instance_id: &InstanceId,
        binding_id: &BindingId,
        service_id: &ServiceId,
        plan_id: &PlanId,
    ) -> Result<()> {
        info!("UnBind()");
        Ok(())
    }

    /// Store the credential handed out by later binds
    #[instrument(skip(self, credential))]
    pub fn register_credential(
        &self,
        instance_id: &InstanceId,
        name: &str,
        credential: Credential,
    ) -> Result<()> {
        let previous = self
            .store
            .put(ServiceInstance::new(instance_id.clone(), name, credential))?;
        if previous.is_some() {
            info!("Replaced credential of existing instance");
        }
        Ok(())
    }
}

impl Default for ProvisioningController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

/// Operations a deployer does not support surface as unimplemented
fn delegated(deployer: &dyn Deployer, source: DeployerError) -> BrokerError {
    match source {
        DeployerError::Unsupported(what) => BrokerError::Unimplemented(what),
        source => BrokerError::Delegated {
            deployer: deployer.id().clone(),
            source,
        },
    }
}

fn service_name(deployer: &dyn Deployer, service_id: &ServiceId) -> String {
    deployer
        .catalog_entries()
        .into_iter()
        .find(|s| &s.id == service_id)
        .map(|s| s.name)
        .unwrap_or_else(|| service_id.to_string())
}
