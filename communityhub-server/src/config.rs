//! Database and runtime configuration
//!
//! Values normally arrive from environment variables through the CLI
//! (`TIDB_*`, `APP_ENV`, `DB_*`). This module only holds the resolved
//! settings and the rules that depend on the deployment environment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::db::ConnectError;

/// Host used outside production when `TIDB_HOST` is unset
pub const DEFAULT_DEV_HOST: &str = "127.0.0.1";

/// TiDB's default MySQL protocol port
pub const DEFAULT_PORT: u16 = 4000;

pub const DEFAULT_DATABASE: &str = "communityhub";

/// Configuration error (bad values, not missing connection parameters)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid environment '{0}' (expected development or production)")]
    InvalidEnvironment(String),
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::InvalidEnvironment(other.to_owned())),
        }
    }
}

/// TLS behaviour for database connections.
///
/// Derived from `TIDB_ENABLE_SSL` and `TIDB_SSL_STRICT`. Permissive mode
/// encrypts the link but skips CA and hostname verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    #[default]
    Disabled,
    Permissive,
    Strict,
}

impl TlsMode {
    pub fn from_flags(enabled: bool, strict: bool) -> Self {
        match (enabled, strict) {
            (false, _) => Self::Disabled,
            (true, false) => Self::Permissive,
            (true, true) => Self::Strict,
        }
    }
}

/// Retry and revalidation policy for a connection cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Authenticate attempts per cycle (not counting the bootstrap retry)
    pub attempts: u32,
    /// Deadline applied to each authenticate attempt
    pub attempt_timeout: Duration,
    /// Fixed pause between failed attempts
    pub retry_delay: Duration,
    /// How long a successful check stays trusted. `None` keeps the
    /// connected state until a probe fails or `reset` is called.
    pub revalidate_after: Option<Duration>,
}

impl RetryPolicy {
    /// Production fails fast with a single attempt; development retries.
    pub fn for_environment(environment: Environment) -> Self {
        let attempts = if environment.is_production() { 1 } else { 5 };
        Self {
            attempts,
            attempt_timeout: Duration::from_millis(4000),
            retry_delay: Duration::from_millis(2000),
            revalidate_after: Some(Duration::from_secs(60)),
        }
    }
}

/// Resolved database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub environment: Environment,
    /// `None` when `TIDB_HOST` was not provided
    pub host: Option<String>,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub tls: TlsMode,
    pub retry: RetryPolicy,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Defaults for the given environment, matching the env-var defaults.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            host: None,
            port: DEFAULT_PORT,
            user: "root".to_string(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            tls: TlsMode::Disabled,
            retry: RetryPolicy::for_environment(environment),
            max_connections: 5,
        }
    }

    /// Effective host: the configured one, or localhost outside production.
    pub fn resolved_host(&self) -> Option<&str> {
        match self.host.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => Some(host),
            _ if self.environment.is_production() => None,
            _ => Some(DEFAULT_DEV_HOST),
        }
    }

    /// Check the parameters required before any network call is made.
    pub fn validate(&self) -> Result<(), ConnectError> {
        if self.resolved_host().is_none() {
            return Err(ConnectError::ConfigurationMissing { field: "TIDB_HOST" });
        }
        if self.database.trim().is_empty() {
            return Err(ConnectError::ConfigurationMissing {
                field: "TIDB_DB_NAME",
            });
        }
        Ok(())
    }
}
