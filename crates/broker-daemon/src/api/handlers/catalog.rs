//! Catalog handler

use super::run_blocking;
use crate::api::state::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Json};
use broker_types::Catalog;

/// Services and plans of every registered deployer
pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<Json<Catalog>> {
    let catalog = run_blocking(&state, |controller| Ok(controller.catalog())).await?;
    Ok(Json(catalog))
}
