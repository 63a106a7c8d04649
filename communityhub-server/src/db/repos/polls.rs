//! Poll repository

use sqlx::MySqlPool;

use super::DbError;
use crate::models::NewPoll;

pub struct PollRepo<'a> {
    pool: &'a MySqlPool,
}

impl<'a> PollRepo<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a poll and return its id.
    pub async fn create(&self, poll: &NewPoll) -> Result<u64, DbError> {
        let result = sqlx::query("INSERT INTO polls (question, status, end_date) VALUES (?, ?, ?)")
            .bind(&poll.question)
            .bind(poll.status.as_str())
            .bind(poll.end_date)
            .execute(self.pool)
            .await?;

        Ok(result.last_insert_id())
    }

    /// Active polls that have not reached their end date.
    pub async fn count_active(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM polls
            WHERE status = 'Active' AND (end_date IS NULL OR end_date >= UTC_TIMESTAMP())
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    pub async fn clear(&self) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM polls").execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}
