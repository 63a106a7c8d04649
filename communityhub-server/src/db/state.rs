//! Connection state machine
//!
//! `Disconnected -> Connecting -> {Connected | Failed}`. The retry decisions
//! for one cycle live in [`Cycle`], a plain value with no I/O, so the policy
//! can be tested without a database.

use std::fmt;

use serde::Serialize;

use super::ConnectError;

/// Process-wide connection status
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed(String),
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed: {}", reason),
            other => f.write_str(other.label()),
        }
    }
}

/// What the manager should do after an attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Connected,
    /// Create the database, then retry without spending an attempt
    Bootstrap,
    /// Sleep the retry delay, then try again
    Retry { attempts_remaining: u32 },
    GiveUp { reason: String },
}

/// Bookkeeping for a single connection cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    attempts_remaining: u32,
    attempts_made: u32,
    bootstrapped: bool,
}

impl Cycle {
    /// Start a cycle with `attempts` tries; zero is treated as one.
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts_remaining: attempts.max(1),
            attempts_made: 0,
            bootstrapped: false,
        }
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    /// Number of authenticate calls recorded so far, bootstrap retry included.
    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    /// Advance after an authenticate attempt.
    pub fn on_attempt(&mut self, outcome: Result<(), &ConnectError>) -> Step {
        self.attempts_made += 1;
        match outcome {
            Ok(()) => Step::Connected,
            Err(ConnectError::DatabaseNotFound { .. }) if !self.bootstrapped => {
                self.bootstrapped = true;
                Step::Bootstrap
            }
            Err(err) if !err.is_retryable() => {
                self.attempts_remaining = 0;
                Step::GiveUp {
                    reason: err.to_string(),
                }
            }
            Err(err) => self.consume(err),
        }
    }

    /// A failed bootstrap costs an attempt like any other failure.
    pub fn on_bootstrap_failed(&mut self, err: &ConnectError) -> Step {
        self.consume(err)
    }

    fn consume(&mut self, err: &ConnectError) -> Step {
        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        if self.attempts_remaining == 0 {
            Step::GiveUp {
                reason: err.to_string(),
            }
        } else {
            Step::Retry {
                attempts_remaining: self.attempts_remaining,
            }
        }
    }
}

/// Point-in-time view of the connection state, for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSnapshot {
    pub status: String,
    pub attempts_remaining: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
