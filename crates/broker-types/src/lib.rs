//! Broker Types - Protocol data model for the managed services broker
//!
//! The broker sits between a service-catalog consumer (an orchestration
//! platform) and the deployers that materialize managed services on a
//! cluster. This crate holds the vocabulary both sides share.
//!
//! ## Key Concepts
//!
//! - **Catalog**: Services and plans offered by every registered deployer
//! - **Instance**: A provisioned unit of a managed service, keyed by a caller-supplied id
//! - **Binding**: Handing out the credential of an existing instance
//! - **Operation state**: Three-state result of polling an asynchronous operation

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod catalog;
pub mod ids;
pub mod instance;
pub mod operation;
pub mod request;
pub mod response;

// Re-export main types
pub use catalog::{
    Catalog, InputParametersSchema, RequestResponseSchema, Schemas, Service, ServiceBindingSchema,
    ServiceInstanceSchema, ServicePlan,
};
pub use ids::{BindingId, DeployerId, InstanceId, PlanId, ServiceId};
pub use instance::{Credential, ServiceInstance};
pub use operation::{OperationState, ParseOperationStateError};
pub use request::{BindingRequest, ContextProfile, CreateServiceInstanceRequest};
pub use response::{
    CreateServiceBindingResponse, CreateServiceInstanceResponse, DeleteServiceInstanceResponse,
    LastOperationResponse, ResponseCode,
};
