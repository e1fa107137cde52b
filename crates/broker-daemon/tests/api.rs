//! Router tests against an in-memory cluster

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use broker_daemon::{build_controller, create_router, AppState, DaemonConfig};
use broker_deployers::services::fuse;
use broker_deployers::{ClusterClient, InMemoryCluster, Manifest, DEPLOYMENT_CONFIG_KIND};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Router, Arc<InMemoryCluster>) {
    let cluster = Arc::new(InMemoryCluster::new());
    let controller = build_controller(&DaemonConfig::default(), cluster.clone()).unwrap();
    let router = create_router(AppState::new(Arc::new(controller)), false);
    (router, cluster)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn provision_body() -> Value {
    json!({
        "service_id": fuse::SERVICE_ID,
        "plan_id": fuse::PLAN_ID,
        "context": {"platform": "kubernetes", "namespace": "team-a"}
    })
}

#[tokio::test]
async fn health_returns_200() {
    let (app, _) = test_app();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["deployers"], 2);
}

#[tokio::test]
async fn catalog_lists_every_deployer() {
    let (app, _) = test_app();
    let (status, json) = send(&app, "GET", "/v2/catalog", None).await;

    assert_eq!(status, StatusCode::OK);
    let mut ids: Vec<&str> = json["services"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["fuse-service-id", "launcher-service-id"]);
}

#[tokio::test]
async fn provision_then_bind() {
    let (app, _) = test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/v2/service_instances/abc?accepts_incomplete=true",
        Some(provision_body()),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["dashboard_url"], "https://fuse-abc.apps.broker.local");
    assert_eq!(json["operation"], "provision");

    let (status, json) = send(
        &app,
        "PUT",
        "/v2/service_instances/abc/service_bindings/b-1",
        Some(json!({"service_id": fuse::SERVICE_ID, "plan_id": fuse::PLAN_ID})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["credentials"]["namespace"], "fuse-abc");
}

#[tokio::test]
async fn provision_unknown_service_is_internal_error() {
    let (app, _) = test_app();
    let (status, json) = send(
        &app,
        "PUT",
        "/v2/service_instances/abc",
        Some(json!({"service_id": "nope", "plan_id": "p"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["operation"], "provision");
}

#[tokio::test]
async fn provision_twice_reports_failing_step() {
    let (app, _) = test_app();
    send(&app, "PUT", "/v2/service_instances/abc", Some(provision_body())).await;

    let (status, json) =
        send(&app, "PUT", "/v2/service_instances/abc", Some(provision_body())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "DEPLOYER_FAILED");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("create namespace for fuse service"));
}

#[tokio::test]
async fn bind_unknown_instance_is_not_found() {
    let (app, _) = test_app();
    let (status, json) = send(
        &app,
        "PUT",
        "/v2/service_instances/ghost/service_bindings/b-1",
        Some(json!({"service_id": fuse::SERVICE_ID, "plan_id": fuse::PLAN_ID})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn last_operation_follows_rollouts() {
    let (app, cluster) = test_app();
    send(&app, "PUT", "/v2/service_instances/abc", Some(provision_body())).await;

    let uri = format!(
        "/v2/service_instances/abc/last_operation?service_id={}&plan_id={}&operation=provision",
        fuse::SERVICE_ID,
        fuse::PLAN_ID
    );

    // The operator has not created any deployment config yet
    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "in progress");
    assert_eq!(json["description"], "syndesis-oauthproxy has not been created yet");

    for rollout in fuse::ROLLOUTS {
        cluster
            .create(
                &Manifest::new("apps.openshift.io/v1", DEPLOYMENT_CONFIG_KIND, rollout)
                    .in_namespace("fuse-abc"),
            )
            .unwrap();
    }

    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "in progress");

    for rollout in fuse::ROLLOUTS {
        cluster
            .set_status(
                DEPLOYMENT_CONFIG_KIND,
                "fuse-abc",
                rollout,
                json!({"conditions": [{"type": "Available", "status": "True"}]}),
            )
            .unwrap();
    }
    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "succeeded");
    assert_eq!(json["description"], "fuse deployed successfully");
}

#[tokio::test]
async fn last_operation_unknown_service() {
    let (app, _) = test_app();
    let (status, json) = send(
        &app,
        "GET",
        "/v2/service_instances/abc/last_operation?service_id=nope&plan_id=p",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "NO_MATCHING_DEPLOYER");
}

#[tokio::test]
async fn unbind_and_remove_always_succeed() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        "DELETE",
        "/v2/service_instances/ghost/service_bindings/b-1?service_id=s&plan_id=p",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "DELETE",
        "/v2/service_instances/ghost?service_id=s&plan_id=p",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
