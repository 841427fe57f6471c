use std::{
    future::Future,
    sync::{Arc, OnceLock},
    time::Duration
};

use tracing::{info, warn};

use crate::database::{
    client::{ReferenceClient, ReferenceError},
    db_structs::ReferenceEntry,
    reference_index::ReferenceIndex
};

/// How often and how patiently a failed reference load is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` retries until the load succeeds
    pub max_attempts: Option<u32>,
    pub initial_backoff: Duration,
    pub max_backoff: Duration
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: None,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(300)
        }
    }
}

impl RetryPolicy {
    /// Delay after the `attempt`-th failure (1-based), doubling each time.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Holds the reference index for the lifetime of the process.
///
/// The slot is filled at most once. Until then [`ReferenceStore::index`]
/// returns `None` and callers must refuse to score rather than fall back to
/// an empty index.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    slot: OnceLock<Arc<ReferenceIndex>>
}

impl ReferenceStore {
    pub fn new() -> ReferenceStore {
        ReferenceStore { slot: OnceLock::new() }
    }

    pub fn with_index(index: ReferenceIndex) -> ReferenceStore {
        let store = ReferenceStore::new();
        store.install(index);
        store
    }

    pub fn index(&self) -> Option<Arc<ReferenceIndex>> {
        self.slot.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Returns the installed index. A second install is ignored and the first
    /// index is kept.
    pub fn install(&self, index: ReferenceIndex) -> Arc<ReferenceIndex> {
        if self.slot.set(Arc::new(index)).is_err() {
            warn!("Reference index already loaded, keeping the existing one");
        }

        self.slot.get().cloned().unwrap_or_default()
    }

    pub fn install_entries(&self, entries: &[ReferenceEntry]) -> Arc<ReferenceIndex> {
        self.install(ReferenceIndex::build(entries))
    }

    /// Fetches the table once; later calls return the cached index.
    pub async fn load(&self, client: &ReferenceClient) -> Result<Arc<ReferenceIndex>, ReferenceError> {
        if let Some(index) = self.index() {
            return Ok(index);
        }

        let entries = client.fetch().await?;
        let index = self.install_entries(&entries);
        info!("Reference index ready with {} titles", index.len());

        Ok(index)
    }

    /// Runs `load` until it yields a table, sleeping between failures as
    /// `policy` dictates. Returns the last error once the attempts run out.
    pub async fn load_with_retry<F, Fut>(
        &self,
        policy: RetryPolicy,
        mut load: F
    ) -> Result<Arc<ReferenceIndex>, ReferenceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Vec<ReferenceEntry>, ReferenceError>>
    {
        let mut attempt = 0;

        loop {
            if let Some(index) = self.index() {
                return Ok(index);
            }

            attempt += 1;
            match load().await {
                Ok(entries) => {
                    let index = self.install_entries(&entries);
                    info!("Reference index ready with {} titles after {} attempt(s)", index.len(), attempt);
                    return Ok(index);
                }
                Err(e) if policy.max_attempts.is_some_and(|max| attempt >= max) => return Err(e),
                Err(e) => {
                    let delay = policy.backoff(attempt);
                    warn!("Reference table load failed (attempt {attempt}): {e}. Retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
