//! API handlers
//!
//! Controller operations are synchronous and may block on deployer work,
//! so every handler runs them through [`run_blocking`].

mod bindings;
mod catalog;
mod health;
mod instances;

pub use bindings::*;
pub use catalog::*;
pub use health::*;
pub use instances::*;

use crate::api::state::AppState;
use crate::error::{ApiError, ApiResult};
use broker_controller::ProvisioningController;

/// Run a controller operation on the blocking pool
pub(crate) async fn run_blocking<T, F>(state: &AppState, op: F) -> ApiResult<T>
where
    F: FnOnce(&ProvisioningController) -> broker_controller::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let controller = state.controller.clone();
    tokio::task::spawn_blocking(move || op(controller.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("controller task failed: {e}")))?
        .map_err(ApiError::from)
}
