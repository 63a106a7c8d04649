//! Connection manager - owns the connection state and runs connect cycles
//!
//! `ensure_connected` never fails loudly: every problem ends up as a
//! `false` return plus a log line. Concurrent callers share the cycle that
//! is already in flight instead of starting their own.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{Mutex, RwLock};
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use super::state::{ConnectionSnapshot, ConnectionStatus, Cycle, Step};
use super::{ConnectError, DatabaseBackend};
use crate::config::DatabaseConfig;

type PendingCycle = Shared<BoxFuture<'static, bool>>;

/// Shared handle to the process-wide connection state
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

struct Inner {
    config: DatabaseConfig,
    backend: Arc<dyn DatabaseBackend>,
    state: RwLock<ConnectionState>,
    in_flight: Mutex<Option<PendingCycle>>,
}

#[derive(Debug, Default)]
struct ConnectionState {
    status: ConnectionStatus,
    attempts_remaining: u32,
    last_error: Option<String>,
    /// When the connection was last confirmed
    verified_at: Option<Instant>,
}

impl ConnectionManager {
    pub fn new(config: DatabaseConfig, backend: Arc<dyn DatabaseBackend>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                backend,
                state: RwLock::new(ConnectionState::default()),
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.inner.config
    }

    /// Make sure the database is reachable, connecting if needed.
    ///
    /// Returns immediately while a recent check is still trusted.
    /// Otherwise joins the in-flight cycle or starts a new one.
    pub async fn ensure_connected(&self) -> bool {
        if self.is_fresh().await {
            return true;
        }

        let pending = {
            let mut in_flight = self.inner.in_flight.lock().await;
            // A cycle may have finished while we waited for the lock
            if self.is_fresh().await {
                return true;
            }
            match in_flight.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let manager = self.clone();
                    let pending = async move { manager.run_cycle().await }.boxed().shared();
                    *in_flight = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Forget the current status so the next call runs a fresh cycle.
    pub async fn reset(&self) {
        let mut state = self.inner.state.write().await;
        *state = ConnectionState::default();
        debug!("connection state reset");
    }

    /// One bounded ping, used by the liveness endpoint.
    ///
    /// A failure while connected demotes the state to `Disconnected`, so
    /// the next gated request reconnects.
    pub async fn probe(&self) -> Result<(), ConnectError> {
        self.inner.config.validate()?;

        let deadline = Instant::now() + self.inner.config.retry.attempt_timeout;
        let result = self.authenticate_before(deadline).await;

        let mut state = self.inner.state.write().await;
        if state.status.is_connected() {
            match &result {
                Ok(()) => state.verified_at = Some(Instant::now()),
                Err(err) => {
                    warn!(error = %err, "liveness probe failed; marking database disconnected");
                    state.status = ConnectionStatus::Disconnected;
                    state.last_error = Some(err.to_string());
                    state.verified_at = None;
                }
            }
        }

        result
    }

    pub async fn status(&self) -> ConnectionStatus {
        self.inner.state.read().await.status.clone()
    }

    pub async fn snapshot(&self) -> ConnectionSnapshot {
        let state = self.inner.state.read().await;
        ConnectionSnapshot {
            status: state.status.to_string(),
            attempts_remaining: state.attempts_remaining,
            last_error: state.last_error.clone(),
        }
    }

    async fn is_fresh(&self) -> bool {
        let state = self.inner.state.read().await;
        match (&state.status, state.verified_at) {
            (ConnectionStatus::Connected, Some(verified_at)) => {
                match self.inner.config.retry.revalidate_after {
                    Some(interval) => verified_at.elapsed() < interval,
                    None => true,
                }
            }
            _ => false,
        }
    }

    async fn run_cycle(self) -> bool {
        let connected = self.drive_cycle().await;
        self.inner.in_flight.lock().await.take();
        connected
    }

    async fn drive_cycle(&self) -> bool {
        let config = &self.inner.config;

        if let Err(err) = config.validate() {
            error!(
                error = %err,
                environment = %config.environment,
                "database configuration incomplete; not attempting to connect"
            );
            self.give_up(err.to_string(), 0).await;
            return false;
        }

        let policy = &config.retry;
        let mut cycle = Cycle::new(policy.attempts);
        self.begin(cycle.attempts_remaining()).await;

        loop {
            let deadline = Instant::now() + policy.attempt_timeout;
            let outcome = self.authenticate_before(deadline).await;

            let (step, failure) = match cycle.on_attempt(outcome.as_ref().map(|_| ())) {
                Step::Bootstrap => {
                    warn!(
                        database = %config.database,
                        "database does not exist; attempting to create it"
                    );
                    match self.inner.backend.ensure_database_exists().await {
                        Ok(()) => continue,
                        Err(err) => {
                            error!(error = %err, "database bootstrap failed");
                            (cycle.on_bootstrap_failed(&err), Some(err))
                        }
                    }
                }
                step => (step, outcome.err()),
            };

            match step {
                Step::Connected => {
                    info!(
                        attempt = cycle.attempts_made(),
                        host = config.resolved_host().unwrap_or_default(),
                        database = %config.database,
                        "database connected"
                    );
                    self.connected(cycle.attempts_remaining()).await;
                    return true;
                }
                Step::Retry { attempts_remaining } => {
                    if let Some(err) = &failure {
                        warn!(
                            attempt = cycle.attempts_made(),
                            attempts_remaining,
                            error = %err,
                            "unable to connect to the database"
                        );
                        self.record_error(err, attempts_remaining).await;
                    }
                    time::sleep(policy.retry_delay).await;
                }
                Step::GiveUp { reason } => {
                    error!(
                        attempts = cycle.attempts_made(),
                        error = %reason,
                        "max retries reached; running without database connection"
                    );
                    self.give_up(reason, 0).await;
                    return false;
                }
                // on_bootstrap_failed never asks for a second bootstrap
                Step::Bootstrap => continue,
            }
        }
    }

    /// Run `authenticate` with an explicit deadline. Dropping the inner
    /// future at the deadline cancels the attempt.
    async fn authenticate_before(&self, deadline: Instant) -> Result<(), ConnectError> {
        match time::timeout_at(deadline, self.inner.backend.authenticate()).await {
            Ok(result) => result,
            Err(_) => Err(ConnectError::Timeout {
                after: self.inner.config.retry.attempt_timeout,
            }),
        }
    }

    async fn begin(&self, attempts_remaining: u32) {
        let mut state = self.inner.state.write().await;
        state.status = ConnectionStatus::Connecting;
        state.attempts_remaining = attempts_remaining;
        state.verified_at = None;
    }

    async fn connected(&self, attempts_remaining: u32) {
        let mut state = self.inner.state.write().await;
        state.status = ConnectionStatus::Connected;
        state.attempts_remaining = attempts_remaining;
        state.last_error = None;
        state.verified_at = Some(Instant::now());
    }

    async fn record_error(&self, err: &ConnectError, attempts_remaining: u32) {
        let mut state = self.inner.state.write().await;
        state.attempts_remaining = attempts_remaining;
        state.last_error = Some(err.to_string());
    }

    async fn give_up(&self, reason: String, attempts_remaining: u32) {
        let mut state = self.inner.state.write().await;
        state.status = ConnectionStatus::Failed(reason.clone());
        state.attempts_remaining = attempts_remaining;
        state.last_error = Some(reason);
        state.verified_at = None;
    }
}
