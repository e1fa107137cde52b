//! Reference service definitions

pub mod fuse;
pub mod launcher;

use crate::client::ClusterClient;
use crate::definition::DashboardSource;
use crate::deployer::ManifestDeployer;
use std::sync::Arc;

pub fn fuse_deployer(
    client: Arc<dyn ClusterClient>,
    dashboard: DashboardSource,
) -> ManifestDeployer {
    ManifestDeployer::new(fuse::definition(dashboard), client)
}

pub fn launcher_deployer(
    client: Arc<dyn ClusterClient>,
    dashboard: DashboardSource,
) -> ManifestDeployer {
    ManifestDeployer::new(launcher::definition(dashboard), client)
}
