//! Health check endpoint
//!
//! Exempt from the health gate: always answers 200 and reports live
//! database connectivity from a single bounded probe.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::http::server::{AppState, HEALTH_PATH};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: &'static str,
    /// "connected", or the reason the probe failed
    pub database: String,
    pub timestamp: String,
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = match state.db.probe().await {
        Ok(()) => "connected".to_string(),
        Err(err) => err.to_string(),
    };

    Json(HealthResponse {
        status: "ok",
        environment: state.environment.as_str(),
        database,
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(HEALTH_PATH, get(health))
}
