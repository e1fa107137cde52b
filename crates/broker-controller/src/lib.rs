//! # Broker Controller - Deployer registry and provisioning controller
//!
//! The core of the managed services broker:
//!
//! - [`DeployerRegistry`]: maps a requested service to the deployer that
//!   provisions it
//! - [`InstanceStore`]: concurrency-safe instance and credential records
//! - [`ProvisioningController`]: the lifecycle façade (catalog, create,
//!   poll, bind, unbind, remove)
//! - [`StatusAggregator`]: folds ordered readiness probes into one
//!   asynchronous operation state
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use broker_controller::{ControllerConfig, Deployer, ProvisioningController};
//! use broker_types::{CreateServiceInstanceRequest, InstanceId};
//!
//! # fn example(deployer: Arc<dyn Deployer>) -> broker_controller::Result<()> {
//! let mut controller = ProvisioningController::new(ControllerConfig::default());
//! controller.register_deployer(deployer)?;
//!
//! // Registration is done; share the controller with request handlers
//! let controller = Arc::new(controller);
//!
//! let request = CreateServiceInstanceRequest::new("fuse-service-id", "default-fuse");
//! let response = controller.create_service_instance(&InstanceId::new("abc"), &request)?;
//! println!("dashboard: {:?}", response.dashboard_url);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Every controller operation is synchronous. The registry is filled
//! through `&mut self` before the controller is shared, so it needs no
//! lock. The instance store is guarded by one reader/writer lock.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod controller;
pub mod deployer;
pub mod error;
pub mod registry;
pub mod status;
pub mod store;

// Re-exports
pub use config::{ControllerConfig, DuplicatePolicy};
pub use controller::{ProvisioningController, PROVISION_OPERATION};
pub use deployer::{Deployer, ProvisionContext};
pub use error::{BrokerError, DeployerError, DeployerResult, ProbeError, Result};
pub use registry::DeployerRegistry;
pub use status::{FnProbe, OperationReport, ProbeOutcome, ReadinessProbe, StatusAggregator};
pub use store::InstanceStore;
