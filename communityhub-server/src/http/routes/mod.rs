//! Route handlers organized by resource

pub mod dashboard;
pub mod events;
pub mod health;
pub mod root;

use axum::http::Uri;

use super::error::ApiError;

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        path: uri.path().to_owned(),
    }
}
