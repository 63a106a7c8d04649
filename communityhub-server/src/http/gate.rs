//! Health gate middleware
//!
//! Every request except the liveness path waits for
//! [`ConnectionManager::ensure_connected`]. When the database cannot be
//! reached the request is answered with 503 and never reaches a handler.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use super::server::AppState;

const UNAVAILABLE_DETAILS: &str = "database connection could not be established";

pub async fn require_database(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().path() == state.health_path {
        return next.run(request).await;
    }

    if state.db.ensure_connected().await {
        return next.run(request).await;
    }

    let details = state
        .db
        .snapshot()
        .await
        .last_error
        .unwrap_or_else(|| UNAVAILABLE_DETAILS.to_string());

    tracing::warn!(
        method = %request.method(),
        path = %request.uri().path(),
        "rejecting request: database unavailable"
    );

    ApiError::Unavailable { details }.into_response()
}
