//! Database connection pool management
//!
//! Uses sqlx MySqlPool with explicit connection limits. The pool is created
//! lazily: no network traffic happens until the connection manager asks for
//! a connection, so a missing database never blocks startup.

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlSslMode};
use sqlx::MySqlPool;

use crate::config::{DatabaseConfig, TlsMode, DEFAULT_DEV_HOST};

/// Default maximum connections for the pool.
/// Kept low for a single small deployment.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection options for the application database.
pub fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    admin_options(config).database(&config.database)
}

/// Connection options with no database selected, used for administrative
/// statements such as creating the database itself.
pub fn admin_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    // An unresolved host only happens in production, where validation
    // stops the cycle before these options are ever used.
    let host = config.resolved_host().unwrap_or(DEFAULT_DEV_HOST);

    MySqlConnectOptions::new()
        .host(host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .charset("utf8mb4")
        .ssl_mode(ssl_mode(config.tls))
}

fn ssl_mode(tls: TlsMode) -> MySqlSslMode {
    match tls {
        TlsMode::Disabled => MySqlSslMode::Disabled,
        TlsMode::Permissive => MySqlSslMode::Required,
        TlsMode::Strict => MySqlSslMode::VerifyIdentity,
    }
}

/// How long the pool may spend acquiring a connection within one attempt.
///
/// sqlx keeps retrying refused connects until this runs out and then only
/// reports `PoolTimedOut`; half the attempt leaves room for a direct connect
/// that surfaces the real cause.
pub fn acquire_timeout(attempt_timeout: Duration) -> Duration {
    attempt_timeout / 2
}

/// Create a lazily connecting MySQL pool.
///
/// # Example
///
/// ```ignore
/// let config = DatabaseConfig::new(Environment::Development);
/// let pool = create_pool(&config);
/// ```
pub fn create_pool(config: &DatabaseConfig) -> MySqlPool {
    let max_connections = if config.max_connections == 0 {
        DEFAULT_MAX_CONNECTIONS
    } else {
        config.max_connections
    };

    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout(config.retry.attempt_timeout))
        .connect_lazy_with(connect_options(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn strict_tls_verifies_identity() {
        assert!(matches!(ssl_mode(TlsMode::Strict), MySqlSslMode::VerifyIdentity));
        assert!(matches!(ssl_mode(TlsMode::Permissive), MySqlSslMode::Required));
        assert!(matches!(ssl_mode(TlsMode::Disabled), MySqlSslMode::Disabled));
    }

    #[test]
    fn acquire_leaves_room_within_attempt() {
        let attempt = Duration::from_millis(4000);
        assert_eq!(acquire_timeout(attempt), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn pool_is_lazy() {
        // Nothing listens here; building the pool must not try to connect
        let mut config = DatabaseConfig::new(Environment::Development);
        config.port = 1;
        let pool = create_pool(&config);
        assert_eq!(pool.size(), 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let mut config = DatabaseConfig::new(Environment::Development);
        config.host = std::env::var("TIDB_HOST").ok();
        let pool = create_pool(&config);

        let result: (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
