//! Error types for brokerd

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use broker_controller::BrokerError;
use serde::Serialize;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// Deployer registration failed
    #[error("Controller error: {0}")]
    Controller(#[from] BrokerError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Controller error, mapped by its status hint
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Broker(BrokerError::NoSuchInstance(_)) => "NOT_FOUND",
            ApiError::Broker(BrokerError::NoMatchingDeployer(_)) => "NO_MATCHING_DEPLOYER",
            ApiError::Broker(BrokerError::Unimplemented(_)) => "UNIMPLEMENTED",
            ApiError::Broker(BrokerError::Delegated { .. }) => "DEPLOYER_FAILED",
            ApiError::Broker(BrokerError::DuplicateDeployer(_)) => "CONFLICT",
            ApiError::Broker(BrokerError::Lock) | ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Broker(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;
    use broker_controller::DeployerError;
    use broker_types::{DeployerId, InstanceId, ServiceId};

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::from(BrokerError::NoSuchInstance(InstanceId::new("x")))
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );

        assert_eq!(
            ApiError::from(BrokerError::NoMatchingDeployer(ServiceId::new("s")))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        assert_eq!(
            ApiError::from(BrokerError::Unimplemented("last operation"))
                .into_response()
                .status(),
            StatusCode::NOT_IMPLEMENTED
        );

        assert_eq!(
            ApiError::from(BrokerError::Delegated {
                deployer: DeployerId::new("fuse"),
                source: DeployerError::step("create namespace", "exists"),
            })
            .into_response()
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
