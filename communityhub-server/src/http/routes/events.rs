//! Event endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::db::repos::EventRepo;
use crate::http::error::ApiError;
use crate::http::extractors::EventId;
use crate::http::server::AppState;
use crate::models::{Event, EventInput};

/// Confirmation body for deletes
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /api/events - all events ordered by date
async fn list_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = EventRepo::new(&state.pool).list().await?;
    Ok(Json(events))
}

/// POST /api/events - create an event
async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = input.into_new_event()?;
    let created = EventRepo::new(&state.pool).create(event).await?;

    tracing::info!(id = created.id, title = %created.title, "event created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/events/{id} - partial update, blank fields keep stored values
async fn update_event(
    State(state): State<Arc<AppState>>,
    EventId(id): EventId,
    Json(input): Json<EventInput>,
) -> Result<Json<Event>, ApiError> {
    let patch = input.into_patch()?;
    let updated = EventRepo::new(&state.pool).update(id, patch).await?;
    Ok(Json(updated))
}

/// DELETE /api/events/{id}
async fn delete_event(
    State(state): State<Arc<AppState>>,
    EventId(id): EventId,
) -> Result<Json<MessageResponse>, ApiError> {
    EventRepo::new(&state.pool).delete(id).await?;

    tracing::info!(id, "event removed");
    Ok(Json(MessageResponse {
        message: "Event removed",
    }))
}

/// Event routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/{id}", put(update_event).delete(delete_event))
}
