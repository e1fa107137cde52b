//! # Broker Deployers - Manifest-driven deployers
//!
//! Deployers that provision a managed service by creating a fixed sequence
//! of platform objects in a fresh namespace, then report readiness by
//! watching the rollouts those objects start.
//!
//! The platform is reached through the [`ClusterClient`] seam.
//! [`InMemoryCluster`] implements it without any platform for development
//! and tests.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod client;
pub mod definition;
pub mod deployer;
pub mod memory;
pub mod probe;
pub mod services;
pub mod template;

// Re-exports
pub use client::{ClientError, ClusterClient, Manifest, ObjectMeta, NAMESPACE_KIND};
pub use definition::{DashboardSource, DeployerDefinition};
pub use deployer::{ManifestDeployer, MANAGED_BY_LABEL, ROUTE_KIND};
pub use memory::InMemoryCluster;
pub use probe::{RolloutProbe, DEPLOYMENT_CONFIG_KIND};
pub use services::{fuse_deployer, launcher_deployer};
pub use template::{ManifestTemplate, TemplateVars};
