//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::{DaemonConfig, DeployersConfig};
use crate::error::{DaemonError, DaemonResult};
use broker_controller::ProvisioningController;
use broker_deployers::services::{fuse, fuse_deployer, launcher_deployer};
use broker_deployers::{ClusterClient, DashboardSource, InMemoryCluster};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Broker daemon server
pub struct Server {
    config: DaemonConfig,
    controller: Arc<ProvisioningController>,
}

impl Server {
    /// Create a server backed by an in-memory cluster
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let cluster: Arc<dyn ClusterClient> = Arc::new(InMemoryCluster::new());
        Self::with_client(config, cluster)
    }

    /// Create a server whose deployers talk to `client`
    pub fn with_client(config: DaemonConfig, client: Arc<dyn ClusterClient>) -> DaemonResult<Self> {
        let controller = build_controller(&config, client)?;
        Ok(Self {
            config,
            controller: Arc::new(controller),
        })
    }

    pub fn controller(&self) -> &Arc<ProvisioningController> {
        &self.controller
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.controller.clone());
        let app = create_router(state, self.config.server.enable_cors);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Broker daemon listening on {}", addr);
        tracing::info!(
            deployers = ?self.controller.registry().ids(),
            "Registered deployers"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Broker daemon shutting down");
        Ok(())
    }
}

/// Build a controller with the configured reference deployers registered
pub fn build_controller(
    config: &DaemonConfig,
    client: Arc<dyn ClusterClient>,
) -> DaemonResult<ProvisioningController> {
    let mut controller = ProvisioningController::new(config.controller.clone());
    let DeployersConfig {
        fuse: with_fuse,
        launcher: with_launcher,
        route_suffix,
    } = &config.deployers;

    if *with_fuse {
        let dashboard = match route_suffix {
            Some(suffix) => DashboardSource::Suffix(suffix.clone()),
            None => fuse::default_dashboard(),
        };
        controller.register_deployer(Arc::new(fuse_deployer(client.clone(), dashboard)))?;
    }

    if *with_launcher {
        let dashboard = route_suffix
            .clone()
            .map(DashboardSource::Suffix)
            .unwrap_or_default();
        controller.register_deployer(Arc::new(launcher_deployer(client, dashboard)))?;
    }

    if controller.registry().is_empty() {
        tracing::warn!("No deployers registered; every provisioning request will fail");
    }

    Ok(controller)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_types::ServiceId;

    #[test]
    fn test_default_registers_both_deployers() {
        let controller =
            build_controller(&DaemonConfig::default(), Arc::new(InMemoryCluster::new())).unwrap();

        assert_eq!(controller.registry().len(), 2);
        assert!(controller
            .registry()
            .dispatch(&ServiceId::new(fuse::SERVICE_ID))
            .is_ok());
    }

    #[test]
    fn test_disabled_deployers_are_skipped() {
        let mut config = DaemonConfig::default();
        config.deployers.launcher = false;

        let controller = build_controller(&config, Arc::new(InMemoryCluster::new())).unwrap();
        assert_eq!(controller.catalog().services.len(), 1);
    }
}
