//! Connection failure taxonomy
//!
//! Every failure seen while connecting is folded into [`ConnectError`] so the
//! retry loop can decide between retrying, bootstrapping, or giving up.

use std::time::Duration;

use sqlx::mysql::MySqlDatabaseError;

/// MySQL `ER_BAD_DB_ERROR`: unknown database
const ER_BAD_DB_ERROR: u16 = 1049;
/// `ER_DBACCESS_DENIED_ERROR`
const ER_DBACCESS_DENIED: u16 = 1044;
/// `ER_ACCESS_DENIED_ERROR`
const ER_ACCESS_DENIED: u16 = 1045;
/// `ER_ACCESS_DENIED_NO_PASSWORD_ERROR`
const ER_ACCESS_DENIED_NO_PASSWORD: u16 = 1698;

/// Why a connection attempt failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// Required parameter absent; no network call was made
    #[error("missing required configuration: {field}")]
    ConfigurationMissing { field: &'static str },

    #[error("connection attempt timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    /// Server reachable but the target database does not exist
    #[error("unknown database '{name}'")]
    DatabaseNotFound { name: String },

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("network failure: {0}")]
    Network(String),

    /// The administrative create-database step failed
    #[error("database bootstrap failed: {0}")]
    Bootstrap(String),
}

impl ConnectError {
    /// Whether another attempt in the same cycle could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::ConfigurationMissing { .. })
    }

    /// Classify a driver error raised while connecting to `database`.
    pub fn from_sqlx(err: sqlx::Error, database: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let number = db_err
                    .try_downcast_ref::<MySqlDatabaseError>()
                    .map(MySqlDatabaseError::number);
                classify(number, db_err.message(), database)
                    .unwrap_or_else(|| Self::Network(err.to_string()))
            }
            sqlx::Error::Configuration(_) => Self::Authentication(err.to_string()),
            _ => Self::Network(err.to_string()),
        }
    }
}

/// Map a server-reported error to a connect failure.
///
/// `None` means the error says nothing specific and is treated as a network
/// failure by the caller.
pub fn classify(number: Option<u16>, message: &str, database: &str) -> Option<ConnectError> {
    match number {
        Some(ER_BAD_DB_ERROR) => Some(ConnectError::DatabaseNotFound {
            name: database.to_owned(),
        }),
        Some(ER_DBACCESS_DENIED | ER_ACCESS_DENIED | ER_ACCESS_DENIED_NO_PASSWORD) => {
            Some(ConnectError::Authentication(message.to_owned()))
        }
        // TiDB proxies do not always preserve the error number
        _ if message.contains("Unknown database") => Some(ConnectError::DatabaseNotFound {
            name: database.to_owned(),
        }),
        _ => None,
    }
}
