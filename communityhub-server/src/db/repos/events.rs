//! Event repository
//!
//! Handles event CRUD:
//! - list: ordered by date ascending
//! - update: row-locked read-modify-write in one transaction
//! - delete: single statement, affected-row count decides 404

use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};

use super::DbError;
use crate::models::{Event, EventPatch, EventStatus, NewEvent};

const EVENT_COLUMNS: &str =
    "id, title, description, date, location, `type`, status, created_at, updated_at";

/// Event record as stored
#[derive(Debug, Clone, FromRow)]
struct EventRow {
    id: u64,
    title: String,
    description: Option<String>,
    date: DateTime<Utc>,
    location: Option<String>,
    #[sqlx(rename = "type")]
    event_type: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let status: EventStatus = row.status.parse().map_err(|e| DbError::InvalidRow {
            table: "events",
            reason: format!("{}", e),
        })?;

        Ok(Event {
            id: row.id,
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            event_type: row.event_type,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn not_found(id: u64) -> DbError {
    DbError::NotFound {
        resource: "event",
        id: id.to_string(),
    }
}

/// Event repository
pub struct EventRepo<'a> {
    pool: &'a MySqlPool,
}

impl<'a> EventRepo<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// All events, soonest first.
    pub async fn list(&self) -> Result<Vec<Event>, DbError> {
        let sql = format!("SELECT {} FROM events ORDER BY date ASC, id ASC", EVENT_COLUMNS);
        let rows: Vec<EventRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;

        rows.into_iter().map(Event::try_from).collect()
    }

    pub async fn get(&self, id: u64) -> Result<Event, DbError> {
        let sql = format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS);
        let row: EventRow = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;

        Event::try_from(row)
    }

    /// Insert an event and return the stored record.
    pub async fn create(&self, event: NewEvent) -> Result<Event, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (title, description, date, location, `type`, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.event_type)
        .bind(event.status.as_str())
        .execute(self.pool)
        .await?;

        self.get(result.last_insert_id()).await
    }

    /// Apply a partial update.
    ///
    /// Locks the row for the duration of the transaction so concurrent
    /// updates cannot interleave their read and write.
    pub async fn update(&self, id: u64, patch: EventPatch) -> Result<Event, DbError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {} FROM events WHERE id = ? FOR UPDATE", EVENT_COLUMNS);
        let row: EventRow = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found(id))?;

        let mut event = Event::try_from(row)?;
        patch.apply(&mut event);

        sqlx::query(
            r#"
            UPDATE events
            SET title = ?, description = ?, date = ?, location = ?, `type` = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.event_type)
        .bind(event.status.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Upcoming events that have not started yet, for the dashboard.
    pub async fn count_upcoming(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM events WHERE status = 'upcoming' AND date >= UTC_TIMESTAMP()",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Remove every event. Used by the seeder's reset mode.
    pub async fn clear(&self) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM events").execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}
