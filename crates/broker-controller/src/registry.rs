//! Deployer registry
//!
//! Maps deployer ids to deployers. Populated at startup and read-only while
//! requests are served: every mutation takes `&mut self`, so registration
//! cannot race with dispatch once the owning controller is shared.

use crate::config::DuplicatePolicy;
use crate::deployer::Deployer;
use crate::error::{BrokerError, Result};
use broker_types::{Catalog, DeployerId, ServiceId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry of deployers keyed by their self-reported id
pub struct DeployerRegistry {
    deployers: BTreeMap<DeployerId, Arc<dyn Deployer>>,
    policy: DuplicatePolicy,
}

impl DeployerRegistry {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            deployers: BTreeMap::new(),
            policy,
        }
    }

    /// Register a deployer under `deployer.id()`.
    ///
    /// With [`DuplicatePolicy::Replace`] a prior entry with the same id is
    /// silently replaced; with [`DuplicatePolicy::Reject`] the call fails
    /// and the prior entry stays.
    pub fn register(&mut self, deployer: Arc<dyn Deployer>) -> Result<()> {
        let id = deployer.id().clone();

        if self.deployers.contains_key(&id) {
            match self.policy {
                DuplicatePolicy::Reject => return Err(BrokerError::DuplicateDeployer(id)),
                DuplicatePolicy::Replace => {
                    warn!(deployer = %id, "Replacing previously registered deployer");
                }
            }
        }

        debug!(deployer = %id, "Registered deployer");
        self.deployers.insert(id, deployer);
        Ok(())
    }

    /// Concatenate the entries of every registered deployer.
    ///
    /// Entries are neither cached nor deduplicated. Callers must not rely
    /// on the order of services.
    pub fn catalog(&self) -> Catalog {
        let services = self
            .deployers
            .values()
            .flat_map(|d| d.catalog_entries())
            .collect();
        Catalog::new(services)
    }

    /// Deployer responsible for `service_id`.
    ///
    /// When several deployers claim the service, the one with the smallest
    /// id wins regardless of registration order.
    pub fn dispatch(&self, service_id: &ServiceId) -> Result<Arc<dyn Deployer>> {
        self.deployers
            .values()
            .find(|d| d.responsible_for(service_id))
            .cloned()
            .ok_or_else(|| BrokerError::NoMatchingDeployer(service_id.clone()))
    }

    pub fn get(&self, id: &DeployerId) -> Option<&Arc<dyn Deployer>> {
        self.deployers.get(id)
    }

    pub fn ids(&self) -> Vec<DeployerId> {
        self.deployers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.deployers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deployers.is_empty()
    }
}

impl Default for DeployerRegistry {
    fn default() -> Self {
        Self::new(DuplicatePolicy::default())
    }
}
