use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use ecotrack::directory::{directory_router, DirectoryService};
use ecotrack::footprint::{footprint_router, FootprintPredictor, FootprintService};
use ecotrack::leaderboard::{leaderboard_router, LeaderboardService};

use crate::infra::{AppState, InMemoryStore};

/// Assembles the full API surface over one shared store: footprints,
/// leaderboard analytics, the directory, and the operational endpoints.
pub(crate) fn with_core_routes<P>(store: Arc<InMemoryStore>, predictor: P) -> axum::Router
where
    P: FootprintPredictor + 'static,
{
    let footprints = Arc::new(FootprintService::new(store.clone(), predictor));
    let analytics = Arc::new(LeaderboardService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let directory = Arc::new(DirectoryService::new(
        store.clone(),
        store.clone(),
        store,
    ));

    footprint_router(footprints)
        .merge(leaderboard_router(analytics))
        .merge(directory_router(directory))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
