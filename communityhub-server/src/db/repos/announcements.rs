//! Announcement repository

use sqlx::MySqlPool;

use super::DbError;
use crate::models::NewAnnouncement;

pub struct AnnouncementRepo<'a> {
    pool: &'a MySqlPool,
}

impl<'a> AnnouncementRepo<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert an announcement and return its id.
    pub async fn create(&self, announcement: &NewAnnouncement) -> Result<u64, DbError> {
        let result =
            sqlx::query("INSERT INTO announcements (title, content, priority) VALUES (?, ?, ?)")
                .bind(&announcement.title)
                .bind(&announcement.content)
                .bind(announcement.priority.as_str())
                .execute(self.pool)
                .await?;

        Ok(result.last_insert_id())
    }

    /// Announcements created in the last `days` days.
    ///
    /// Compared against `NOW()` because `created_at` is filled from
    /// `CURRENT_TIMESTAMP` in the session time zone.
    pub async fn count_recent(&self, days: u32) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM announcements WHERE created_at >= NOW() - INTERVAL ? DAY",
        )
        .bind(days)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    pub async fn clear(&self) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM announcements")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
