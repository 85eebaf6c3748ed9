//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness + process summary
//! - `/ready`   : readiness (503 when any check fails)
//! - `/metrics` : Prometheus text format

pub mod health;
pub mod readiness;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use reqmetrics_core::exposition;

use crate::app_state::AppState;

pub use health::HealthReport;
pub use readiness::{CheckResult, Readiness, ReadinessCheck, ReadinessReport};

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport::collect(&state))
}

pub async fn ready(State(state): State<AppState>) -> Response {
    let report = state.readiness().evaluate().await;
    let code = if report.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(report)).into_response()
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.render_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, code = e.code().as_str(), "metrics render failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate metrics" })),
            )
                .into_response()
        }
    }
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Route not found" })),
    )
        .into_response()
}
