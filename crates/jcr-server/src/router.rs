use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all JCR endpoints.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;
    let body_limit = server.max_body_bytes;
    let allow_cors = server.allow_cors;

    let router = Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/flatten", post(handler::flatten_handler))
        .route("/v1/report", post(handler::report_handler))
        .route("/v1/added", post(handler::added_handler))
        .route("/v1/render", post(handler::render_handler))
        .route("/v1/analyze", post(handler::analyze_handler))
        .route("/v1/summary", post(handler::summary_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if allow_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
