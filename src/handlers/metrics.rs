//! Prometheus scrape endpoint

use axum::{Router, http::header, response::IntoResponse, routing::get};

use crate::{
    error::{AppError, AppResult},
    metrics,
    state::AppState,
};

async fn metrics_handler() -> AppResult<impl IntoResponse> {
    let body = metrics::render(&metrics::REGISTRY).map_err(AppError::Internal)?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

/// Metrics routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler))
}
