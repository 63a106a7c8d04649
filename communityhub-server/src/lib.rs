//! communityhub-server: HTTP API for CommunityHub
//!
//! The interesting part is the database connection lifecycle: a single
//! [`db::ConnectionManager`] retries with environment-dependent limits,
//! creates the database when it is missing, and backs a health gate that
//! answers 503 instead of letting handlers touch an unreachable database.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

/// Name reported in logs and exported traces
pub const SERVICE_NAME: &str = "communityhub";

pub use config::{DatabaseConfig, Environment, RetryPolicy, TlsMode};
pub use db::{ConnectError, ConnectionManager, ConnectionStatus};
pub use http::{run_server, AppState, ServerConfig};
