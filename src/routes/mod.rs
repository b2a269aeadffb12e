// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::pipeline::MetricsPipeline;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) pipeline: Arc<Mutex<MetricsPipeline>>,
    pub(crate) config: AppConfig,
}

pub fn app(pipeline: Arc<Mutex<MetricsPipeline>>, config: AppConfig) -> Router {
    let state = AppState { pipeline, config };
    Router::new()
        .route("/", get(|| async { "docker-stats-exporter: metrics at /metrics" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
