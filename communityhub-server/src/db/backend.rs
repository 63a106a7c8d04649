//! Database backend seam
//!
//! The connection manager only needs two things from the database: a cheap
//! authenticate/ping over the pool and the ability to create the target
//! database. [`MySqlBackend`] provides both over sqlx; tests substitute a
//! scripted implementation.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection, MySqlPool};

use super::{bootstrap, pool, ConnectError};
use crate::config::DatabaseConfig;

#[async_trait]
pub trait DatabaseBackend: Send + Sync + 'static {
    /// Acquire a pooled connection and ping it.
    async fn authenticate(&self) -> Result<(), ConnectError>;

    /// Create the target database if it does not exist.
    async fn ensure_database_exists(&self) -> Result<(), ConnectError>;
}

/// MySQL/TiDB backend over a lazily connecting pool
#[derive(Clone)]
pub struct MySqlBackend {
    pool: MySqlPool,
    options: MySqlConnectOptions,
    admin: MySqlConnectOptions,
    database: String,
}

impl MySqlBackend {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            pool: pool::create_pool(config),
            options: pool::connect_options(config),
            admin: pool::admin_options(config),
            database: config.database.clone(),
        }
    }

    /// The pooled data-access handle shared with request handlers.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// One unpooled connect, used when the pool only reports its own
    /// timeout. Success means the server is up and the pool is saturated.
    async fn connect_direct(&self) -> Result<(), ConnectError> {
        let conn: MySqlConnection = self
            .options
            .connect()
            .await
            .map_err(|e| ConnectError::from_sqlx(e, &self.database))?;

        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "closing direct connection failed");
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseBackend for MySqlBackend {
    async fn authenticate(&self) -> Result<(), ConnectError> {
        match self.pool.acquire().await {
            Ok(mut conn) => conn
                .ping()
                .await
                .map_err(|e| ConnectError::from_sqlx(e, &self.database)),
            Err(sqlx::Error::PoolTimedOut) => self.connect_direct().await,
            Err(e) => Err(ConnectError::from_sqlx(e, &self.database)),
        }
    }

    async fn ensure_database_exists(&self) -> Result<(), ConnectError> {
        bootstrap::ensure_database_exists(&self.admin, &self.database).await
    }
}
