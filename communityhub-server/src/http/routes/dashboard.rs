//! Dashboard summary endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::{AnnouncementRepo, EventRepo, PollRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::dashboard::{dashboard_cards, NEW_ANNOUNCEMENT_DAYS};
use crate::models::{DashboardCounts, StatCard};

/// GET /api/dashboard
async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StatCard>>, ApiError> {
    let event_repo = EventRepo::new(&state.pool);
    let poll_repo = PollRepo::new(&state.pool);
    let announcement_repo = AnnouncementRepo::new(&state.pool);
    let (upcoming_events, active_polls, new_announcements) = tokio::try_join!(
        event_repo.count_upcoming(),
        poll_repo.count_active(),
        announcement_repo.count_recent(NEW_ANNOUNCEMENT_DAYS),
    )?;

    Ok(Json(dashboard_cards(&DashboardCounts {
        upcoming_events,
        active_polls,
        new_announcements,
    })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/dashboard", get(dashboard))
}
