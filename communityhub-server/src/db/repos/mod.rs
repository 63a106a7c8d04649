//! Repository implementations for database access
//!
//! Each repository borrows the shared pool and follows these patterns:
//! - Read-modify-write happens inside a transaction with a row lock
//! - Missing rows surface as `DbError::NotFound`, never as empty success

pub mod announcements;
pub mod events;
pub mod polls;

pub use announcements::AnnouncementRepo;
pub use events::EventRepo;
pub use polls::PollRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Stored row no longer satisfies the model's rules
    #[error("invalid row in {table}: {reason}")]
    InvalidRow { table: &'static str, reason: String },
}
