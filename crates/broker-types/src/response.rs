//! Responses returned to the protocol layer

use crate::{Credential, OperationState};
use serde::{Deserialize, Serialize};

/// Status code hint carried by provisioning responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCode {
    Ok,
    Created,
    Accepted,
    InternalServerError,
}

impl ResponseCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            ResponseCode::Ok => 200,
            ResponseCode::Created => 201,
            ResponseCode::Accepted => 202,
            ResponseCode::InternalServerError => 500,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, ResponseCode::InternalServerError)
    }
}

/// Result of a provisioning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceInstanceResponse {
    /// Transport status hint, never serialized into the body
    #[serde(skip, default = "default_code")]
    pub code: ResponseCode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,

    /// Opaque operation token echoed back on polls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    /// Credential to register for later binds
    #[serde(skip)]
    pub credential: Option<Credential>,
}

fn default_code() -> ResponseCode {
    ResponseCode::Ok
}

impl CreateServiceInstanceResponse {
    /// Asynchronous provisioning has started
    pub fn accepted() -> Self {
        Self {
            code: ResponseCode::Accepted,
            dashboard_url: None,
            operation: None,
            credential: None,
        }
    }

    /// The broker could not act on the request
    pub fn internal_error(operation: impl Into<String>) -> Self {
        Self {
            code: ResponseCode::InternalServerError,
            dashboard_url: None,
            operation: Some(operation.into()),
            credential: None,
        }
    }

    pub fn with_dashboard_url(mut self, url: impl Into<String>) -> Self {
        self.dashboard_url = Some(url.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }
}

/// Answer to a last-operation poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOperationResponse {
    pub state: OperationState,

    #[serde(default)]
    pub description: String,
}

impl LastOperationResponse {
    pub fn new(state: OperationState, description: impl Into<String>) -> Self {
        Self {
            state,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteServiceInstanceResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceBindingResponse {
    pub credentials: Credential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ResponseCode::Accepted.as_u16(), 202);
        assert_eq!(ResponseCode::InternalServerError.as_u16(), 500);
        assert!(!ResponseCode::InternalServerError.is_success());
    }

    #[test]
    fn test_code_and_credential_stay_out_of_the_body() {
        let response = CreateServiceInstanceResponse::accepted()
            .with_dashboard_url("https://fuse-abc.apps.example.com")
            .with_credential(Credential::new().with("token", "s3cr3t"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"dashboard_url": "https://fuse-abc.apps.example.com"})
        );
    }

    #[test]
    fn test_internal_error_carries_operation() {
        let response = CreateServiceInstanceResponse::internal_error("provision");
        assert_eq!(response.code, ResponseCode::InternalServerError);
        assert_eq!(response.operation.as_deref(), Some("provision"));
    }
}
