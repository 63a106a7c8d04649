//! HTTP server layer
//!
//! Axum server with:
//! - Database health gate on every route but the liveness check
//! - CORS and request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod gate;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError, HEALTH_PATH};
