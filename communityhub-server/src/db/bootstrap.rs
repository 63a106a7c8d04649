//! Database bootstrap - create the target database when it is missing
//!
//! Runs over its own short-lived connection with no database selected,
//! never through the application pool.

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection, Executor};

use super::ConnectError;

const CHARSET: &str = "utf8mb4";
const COLLATION: &str = "utf8mb4_unicode_ci";

/// MySQL identifier length limit
const MAX_IDENTIFIER_LEN: usize = 64;

/// Build the `CREATE DATABASE IF NOT EXISTS` statement for `name`.
///
/// The name is quoted as an identifier; names that cannot be a database
/// name are rejected instead of being escaped into something surprising.
pub fn create_database_statement(name: &str) -> Result<String, ConnectError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_IDENTIFIER_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '-');

    if !valid {
        return Err(ConnectError::Bootstrap(format!(
            "invalid database name '{}'",
            name
        )));
    }

    Ok(format!(
        "CREATE DATABASE IF NOT EXISTS `{}` CHARACTER SET {} COLLATE {}",
        name, CHARSET, COLLATION
    ))
}

/// Create `database` if absent using `admin` credentials.
///
/// The administrative connection is closed whether or not the statement
/// succeeds.
pub async fn ensure_database_exists(
    admin: &MySqlConnectOptions,
    database: &str,
) -> Result<(), ConnectError> {
    let statement = create_database_statement(database)?;

    let mut conn: MySqlConnection = admin
        .connect()
        .await
        .map_err(|e| ConnectError::Bootstrap(e.to_string()))?;

    let result = Executor::execute(&mut conn, statement.as_str()).await;

    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, "closing bootstrap connection failed");
    }

    result
        .map(|_| {
            tracing::info!(database, "database created or already present");
        })
        .map_err(|e| ConnectError::Bootstrap(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_uses_fixed_charset() {
        let sql = create_database_statement("communityhub").unwrap();
        assert_eq!(
            sql,
            "CREATE DATABASE IF NOT EXISTS `communityhub` CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci"
        );
    }

    #[test]
    fn rejects_injection() {
        let err = create_database_statement("x`; DROP DATABASE mysql; --").unwrap_err();
        assert!(matches!(err, ConnectError::Bootstrap(_)));
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn bootstrap_future_is_send() {
        // Backends box this future behind `#[async_trait]`, which needs Send
        let admin = MySqlConnectOptions::new().host("127.0.0.1").port(1);
        let future = ensure_database_exists(&admin, "communityhub");
        assert_send(&future);
    }

    #[test]
    fn rejects_empty_and_long_names() {
        assert!(create_database_statement("").is_err());
        assert!(create_database_statement(&"a".repeat(65)).is_err());
        assert!(create_database_statement(&"a".repeat(64)).is_ok());
    }
}
