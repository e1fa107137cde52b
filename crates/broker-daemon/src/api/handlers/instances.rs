//! Service instance handlers

use super::run_blocking;
use crate::api::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use broker_types::{
    CreateServiceInstanceRequest, CreateServiceInstanceResponse, DeleteServiceInstanceResponse,
    InstanceId, LastOperationResponse, PlanId, ServiceId,
};
use serde::Deserialize;

/// Query of a provisioning request
#[derive(Debug, Default, Deserialize)]
pub struct ProvisionQuery {
    #[serde(default)]
    pub accepts_incomplete: Option<bool>,
}

/// Provision a service instance
pub async fn create_instance(
    State(state): State<AppState>,
    Path(instance_id): Path<InstanceId>,
    Query(query): Query<ProvisionQuery>,
    Json(mut request): Json<CreateServiceInstanceRequest>,
) -> ApiResult<(StatusCode, Json<CreateServiceInstanceResponse>)> {
    if let Some(accepts_incomplete) = query.accepts_incomplete {
        request.accepts_incomplete = accepts_incomplete;
    }

    let response = run_blocking(&state, move |controller| {
        controller.create_service_instance(&instance_id, &request)
    })
    .await?;

    let status = StatusCode::from_u16(response.code.as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(response)))
}

/// Query of a last-operation poll
#[derive(Debug, Deserialize)]
pub struct LastOperationQuery {
    pub service_id: ServiceId,
    pub plan_id: PlanId,
    #[serde(default)]
    pub operation: Option<String>,
}

/// Poll the asynchronous provisioning of an instance
pub async fn last_operation(
    State(state): State<AppState>,
    Path(instance_id): Path<InstanceId>,
    Query(query): Query<LastOperationQuery>,
) -> ApiResult<Json<LastOperationResponse>> {
    let report = run_blocking(&state, move |controller| {
        controller.poll_instance(&instance_id, &query.service_id, &query.plan_id)
    })
    .await?;

    Ok(Json(report.to_response()))
}

/// Query of a deprovisioning request
#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub service_id: ServiceId,
    pub plan_id: PlanId,
    #[serde(default)]
    pub accepts_incomplete: bool,
}

/// Deprovision a service instance
pub async fn remove_instance(
    State(state): State<AppState>,
    Path(instance_id): Path<InstanceId>,
    Query(query): Query<RemoveQuery>,
) -> ApiResult<Json<DeleteServiceInstanceResponse>> {
    let response = run_blocking(&state, move |controller| {
        controller.remove_service_instance(
            &instance_id,
            &query.service_id,
            &query.plan_id,
            query.accepts_incomplete,
        )
    })
    .await?;

    Ok(Json(response))
}
