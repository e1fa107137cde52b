//! Service binding handlers

use super::run_blocking;
use crate::api::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use broker_types::{
    BindingId, BindingRequest, CreateServiceBindingResponse, InstanceId, PlanId, ServiceId,
};
use serde::Deserialize;

/// Bind an instance, handing out its stored credential
pub async fn bind(
    State(state): State<AppState>,
    Path((instance_id, binding_id)): Path<(InstanceId, BindingId)>,
    Json(request): Json<BindingRequest>,
) -> ApiResult<(StatusCode, Json<CreateServiceBindingResponse>)> {
    let response = run_blocking(&state, move |controller| {
        controller.bind(&instance_id, &binding_id, &request)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Query of an unbind request
#[derive(Debug, Deserialize)]
pub struct UnbindQuery {
    pub service_id: ServiceId,
    pub plan_id: PlanId,
}

/// Release a binding
pub async fn unbind(
    State(state): State<AppState>,
    Path((instance_id, binding_id)): Path<(InstanceId, BindingId)>,
    Query(query): Query<UnbindQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    run_blocking(&state, move |controller| {
        controller.unbind(&instance_id, &binding_id, &query.service_id, &query.plan_id)
    })
    .await?;

    Ok(Json(serde_json::json!({})))
}
