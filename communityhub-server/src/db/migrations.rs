//! Database migrations for CommunityHub tables

use sqlx::MySqlPool;

const CREATE_EVENTS: &str = r#"
    CREATE TABLE IF NOT EXISTS events (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description TEXT NULL,
        date DATETIME NOT NULL,
        location VARCHAR(255) NULL,
        `type` VARCHAR(255) NOT NULL DEFAULT 'General',
        status ENUM('upcoming', 'past', 'draft') NOT NULL DEFAULT 'upcoming',
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
        INDEX idx_events_date (date)
    ) CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci
"#;

const CREATE_POLLS: &str = r#"
    CREATE TABLE IF NOT EXISTS polls (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        question VARCHAR(255) NOT NULL,
        status ENUM('Active', 'Closed') NOT NULL DEFAULT 'Active',
        end_date DATETIME NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
        INDEX idx_polls_status (status)
    ) CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci
"#;

const CREATE_ANNOUNCEMENTS: &str = r#"
    CREATE TABLE IF NOT EXISTS announcements (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        content TEXT NOT NULL,
        priority ENUM('Low', 'Medium', 'High') NOT NULL DEFAULT 'Medium',
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
        INDEX idx_announcements_created (created_at)
    ) CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci
"#;

/// Tables in creation order
const MIGRATIONS: [(&str, &str); 3] = [
    ("events", CREATE_EVENTS),
    ("polls", CREATE_POLLS),
    ("announcements", CREATE_ANNOUNCEMENTS),
];

/// Run all migrations. Each statement is idempotent.
pub async fn run(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    for (table, statement) in MIGRATIONS {
        sqlx::query(statement).execute(pool).await?;
        tracing::debug!(table, "table ready");
    }

    tracing::info!("Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_statement_is_idempotent() {
        for (table, statement) in MIGRATIONS {
            let expected = format!("CREATE TABLE IF NOT EXISTS {} (", table);
            assert!(statement.contains(&expected), "{table} migration");
        }
    }
}
