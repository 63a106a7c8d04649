//! API root banner

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::http::server::AppState;

/// GET /
async fn index() -> &'static str {
    "CommunityHub API is running..."
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}
