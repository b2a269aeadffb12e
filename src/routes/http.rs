// GET handlers: metrics, version

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use super::AppState;
use crate::pipeline::MetricsPipeline;
use crate::version::{NAME, VERSION};

/// GET /version returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /metrics returns the text exposition body.
///
/// Holding the pipeline lock for the whole pull keeps refreshes
/// non-reentrant; concurrent scrapes queue and then mostly hit the cached
/// snapshot. A failed pull answers with the mapped status and a JSON
/// message, and swaps in a freshly built pipeline for the next scrape.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> Response {
    let mut pipeline = state.pipeline.lock().await;
    match pipeline.pull().await {
        Ok(snapshot) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain")],
            snapshot.to_string(),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "metrics refresh failed, rebuilding pipeline");
            let status = e.status_code();
            match MetricsPipeline::from_config(&state.config) {
                Ok(fresh) => *pipeline = fresh,
                Err(rebuild_err) => {
                    tracing::error!(error = %rebuild_err, "pipeline rebuild failed");
                }
            }
            (status, axum::Json(serde_json::json!({ "message": e.to_string() }))).into_response()
        }
    }
}
