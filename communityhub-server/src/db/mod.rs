//! Database layer - connection lifecycle, pool, and repositories
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections), opened lazily
//! - One connection cycle in flight at a time, shared by all callers
//! - Missing database is created once per cycle, then retried
//! - Failures become `false` + logs, never a crashed process

pub mod backend;
pub mod bootstrap;
pub mod error;
pub mod manager;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod seed;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{DatabaseBackend, MySqlBackend};
pub use error::ConnectError;
pub use manager::ConnectionManager;
pub use pool::create_pool;
pub use repos::*;
pub use state::{ConnectionSnapshot, ConnectionStatus};
