//! Database settings from flags and environment
//!
//! Every flag falls back to its environment variable, and `.env` is loaded
//! before parsing, so deployments can configure the binary purely through
//! the environment.

use std::time::Duration;

use clap::Args;
use communityhub_server::config::{DEFAULT_DATABASE, DEFAULT_PORT};
use communityhub_server::{DatabaseConfig, Environment, RetryPolicy, TlsMode};

#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Deployment environment (development or production) [default: $NODE_ENV, else development]
    #[arg(long = "env", env = "APP_ENV")]
    pub environment: Option<Environment>,

    /// Database host (required in production)
    #[arg(long, env = "TIDB_HOST")]
    pub db_host: Option<String>,

    /// Database port
    #[arg(long, env = "TIDB_PORT", default_value_t = DEFAULT_PORT)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "TIDB_USER", default_value = "root")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "TIDB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database name (created on first connect if missing)
    #[arg(long, env = "TIDB_DB_NAME", default_value = DEFAULT_DATABASE)]
    pub db_name: String,

    /// Connect over TLS
    #[arg(long, env = "TIDB_ENABLE_SSL")]
    pub db_ssl: bool,

    /// Verify the server certificate and hostname (requires --db-ssl)
    #[arg(long, env = "TIDB_SSL_STRICT")]
    pub db_ssl_strict: bool,

    /// Attempts per connection cycle [default: 1 in production, 5 otherwise]
    #[arg(long, env = "DB_CONNECT_ATTEMPTS")]
    pub connect_attempts: Option<u32>,

    /// Per-attempt timeout in milliseconds
    #[arg(long, env = "DB_CONNECT_TIMEOUT_MS", default_value_t = 4000)]
    pub connect_timeout_ms: u64,

    /// Delay between failed attempts in milliseconds
    #[arg(long, env = "DB_RETRY_DELAY_MS", default_value_t = 2000)]
    pub retry_delay_ms: u64,

    /// Seconds a successful check is trusted before revalidating (0 = never)
    #[arg(long, env = "DB_REVALIDATE_SECS", default_value_t = 60)]
    pub revalidate_secs: u64,
}

/// Older deployments select production through this variable
pub const LEGACY_ENV_VAR: &str = "NODE_ENV";

/// `--env`/`APP_ENV` wins; otherwise a recognised `NODE_ENV` value.
/// Anything else (`test`, unset) means development.
fn resolve_environment(explicit: Option<Environment>, legacy: Option<&str>) -> Environment {
    explicit
        .or_else(|| legacy.and_then(|value| value.parse().ok()))
        .unwrap_or_default()
}

impl DbArgs {
    pub fn into_config(self) -> DatabaseConfig {
        let legacy = std::env::var(LEGACY_ENV_VAR).ok();
        let environment = resolve_environment(self.environment, legacy.as_deref());
        if self.environment.is_none() && legacy.is_some() {
            tracing::debug!(%environment, "environment taken from {}", LEGACY_ENV_VAR);
        }

        let defaults = RetryPolicy::for_environment(environment);
        let tls = TlsMode::from_flags(self.db_ssl, self.db_ssl_strict);

        match tls {
            TlsMode::Permissive => tracing::warn!(
                "TLS enabled without certificate verification; set TIDB_SSL_STRICT=true to verify"
            ),
            TlsMode::Disabled if self.db_ssl_strict => {
                tracing::warn!("TIDB_SSL_STRICT ignored because TLS is disabled")
            }
            _ => {}
        }

        DatabaseConfig {
            environment,
            host: self.db_host,
            port: self.db_port,
            user: self.db_user,
            password: self.db_password,
            database: self.db_name,
            tls,
            retry: RetryPolicy {
                attempts: self.connect_attempts.unwrap_or(defaults.attempts),
                attempt_timeout: Duration::from_millis(self.connect_timeout_ms),
                retry_delay: Duration::from_millis(self.retry_delay_ms),
                revalidate_after: (self.revalidate_secs > 0)
                    .then(|| Duration::from_secs(self.revalidate_secs)),
            },
            ..DatabaseConfig::new(environment)
        }
    }
}
