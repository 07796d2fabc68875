//! # edl-api — REST Surface
//!
//! The HTTP layer of the decision ledger, built on Axum/Tower/Tokio.
//! Assembles the per-surface routers into a single application with
//! shared middleware for tracing, CORS, and request timeouts.
//!
//! ## Surfaces
//!
//! - `/api/evidence/*` — intake, validation, sealing, quarantine
//! - `/api/workitems/*` — routed queue, conflict resolution, decisions
//! - `/api/entities/*` — canonical records with derived readiness
//! - `/api/suggestions/*` — mapping review queue
//! - `/api/audit/*` — chain reads and verification
//! - `/health/*` — liveness and readiness probes (no tenant scope)
//! - `/metrics` — Prometheus scrape endpoint
//! - `/openapi.json` — generated API document
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → CorsLayer (permissive) → TimeoutLayer (8s → 408)
//!
//! ## Error Contract
//!
//! Every failure body is `{"error": {"code", "message"}}`. Validation
//! maps to 422, lookups to 404, state and type mismatches to 409, and
//! internal failures to a detail-free 500.
//!
//! ## Security Invariant
//!
//! Every data route resolves its tenant scope from `tenant_id` before
//! touching the store. The health probes are the only unscoped routes
//! and they read nothing tenant-owned.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub mod error;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::AppState;

/// Request deadline. The timeout layer answers 408 past it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::evidence::router())
        .merge(routes::workitems::router())
        .merge(routes::entities::router())
        .merge(routes::suggestions::router())
        .merge(routes::audit::router())
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(metrics::render_metrics))
        .route("/openapi.json", get(openapi_spec))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Process liveness. Always 200 while the process runs.
async fn liveness() -> Json<Value> {
    Json(json!({"status": "alive"}))
}

/// Store reachability. 503 when the ledger store cannot be read.
async fn readiness(State(state): State<AppState>) -> Response {
    match state.service.tenants() {
        Ok(_) => (StatusCode::OK, Json(json!({"status": "ready"}))).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unavailable"})),
            )
                .into_response()
        }
    }
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}
