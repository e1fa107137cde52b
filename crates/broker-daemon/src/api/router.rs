//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the broker router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let broker_routes = Router::new()
        .route("/catalog", get(handlers::get_catalog))
        .route(
            "/service_instances/:instance_id",
            put(handlers::create_instance).delete(handlers::remove_instance),
        )
        .route(
            "/service_instances/:instance_id/last_operation",
            get(handlers::last_operation),
        )
        .route(
            "/service_instances/:instance_id/service_bindings/:binding_id",
            put(handlers::bind).delete(handlers::unbind),
        );

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v2", broker_routes)
        .layer(TraceLayer::new_for_http());

    let router = if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
