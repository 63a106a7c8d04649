//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;

/// Event id from the path. Anything that is not a positive integer cannot
/// name a stored event, so it is reported as not found.
pub struct EventId(pub u64);

impl<S> FromRequestParts<S> for EventId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found("missing"))?;

        match raw.parse::<u64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(not_found(&raw)),
        }
    }
}

fn not_found(raw: &str) -> ApiError {
    ApiError::NotFound {
        resource: "event",
        id: raw.to_owned(),
    }
}
