//! Broker daemon library
//!
//! Components of `brokerd`:
//! - REST API handlers for the broker protocol
//! - Configuration loading
//! - Server lifecycle management

#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use api::{create_router, AppState};
pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError};
pub use server::{build_controller, Server};
