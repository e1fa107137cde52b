//! Configuration for brokerd

use broker_controller::ControllerConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Provisioning controller configuration
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Which reference deployers to register
    #[serde(default)]
    pub deployers: DeployersConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            enable_cors: true,
        }
    }
}

/// Deployer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployersConfig {
    /// Register the fuse deployer
    #[serde(default = "default_true")]
    pub fuse: bool,

    /// Register the launcher deployer
    #[serde(default = "default_true")]
    pub launcher: bool,

    /// Router suffix for dashboard hosts. Without one, fuse discovers it
    /// from the `default/registry-console` route.
    #[serde(default = "default_route_suffix")]
    pub route_suffix: Option<String>,
}

impl Default for DeployersConfig {
    fn default() -> Self {
        Self {
            fuse: true,
            launcher: true,
            route_suffix: default_route_suffix(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_route_suffix() -> Option<String> {
    Some("apps.broker.local".to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `BROKER_` environment variables (`BROKER_SERVER__LISTEN_ADDR`)
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("BROKER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
