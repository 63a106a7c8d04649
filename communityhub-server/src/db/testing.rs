//! Scripted database backend for tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{ConnectError, DatabaseBackend};

/// Outcome of one scripted authenticate call
#[derive(Debug, Clone)]
pub enum Script {
    Ok,
    Fail(ConnectError),
    MissingDatabase,
    /// Succeed after sleeping
    Delay(Duration),
    /// Never complete
    Hang,
}

/// Backend that replays a script, then repeats `fallback` forever.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Script>>,
    fallback: Script,
    bootstrap_error: Mutex<Option<ConnectError>>,
    authenticate_calls: AtomicUsize,
    bootstrap_calls: AtomicUsize,
    in_progress: AtomicUsize,
    max_concurrent: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Script>) -> Arc<Self> {
        Self::with_fallback(script, Script::Ok)
    }

    /// Every call fails with `err`.
    pub fn failing(err: ConnectError) -> Arc<Self> {
        Self::with_fallback(Vec::new(), Script::Fail(err))
    }

    fn with_fallback(script: Vec<Script>, fallback: Script) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            bootstrap_error: Mutex::new(None),
            authenticate_calls: AtomicUsize::new(0),
            bootstrap_calls: AtomicUsize::new(0),
            in_progress: AtomicUsize::new(0),
            max_concurrent: AtomicUsize::new(0),
        })
    }

    pub fn fail_bootstrap(&self, err: ConnectError) {
        *self.bootstrap_error.lock().unwrap() = Some(err);
    }

    pub fn authenticate_calls(&self) -> usize {
        self.authenticate_calls.load(Ordering::SeqCst)
    }

    pub fn bootstrap_calls(&self) -> usize {
        self.bootstrap_calls.load(Ordering::SeqCst)
    }

    /// Highest number of overlapping authenticate calls seen
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent.load(Ordering::SeqCst)
    }

    fn next(&self) -> Script {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

struct InProgress<'a>(&'a AtomicUsize);

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DatabaseBackend for ScriptedBackend {
    async fn authenticate(&self) -> Result<(), ConnectError> {
        self.authenticate_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_progress.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent.fetch_max(now, Ordering::SeqCst);
        let _guard = InProgress(&self.in_progress);

        match self.next() {
            Script::Ok => Ok(()),
            Script::Fail(err) => Err(err),
            Script::MissingDatabase => Err(ConnectError::DatabaseNotFound {
                name: "communityhub".into(),
            }),
            Script::Delay(duration) => {
                tokio::time::sleep(duration).await;
                Ok(())
            }
            Script::Hang => std::future::pending().await,
        }
    }

    async fn ensure_database_exists(&self) -> Result<(), ConnectError> {
        self.bootstrap_calls.fetch_add(1, Ordering::SeqCst);
        match self.bootstrap_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
