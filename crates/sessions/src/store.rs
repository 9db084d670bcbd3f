//! Session storage.
//!
//! The store is a keyed bag of `SessionState`. The in-memory implementation
//! keeps everything in process: every session is lost on restart and the
//! admin has to log in again.

use async_trait::async_trait;
use moka::future::Cache;
use site_core::{Result, SessionKey, SessionState};
use std::time::Duration;
use telemetry::metrics;
use tracing::debug;

/// Storage backend for per-session auth state.
///
/// A `save` followed by a `load` on the same key must observe the save.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the state for `key`, or an empty bag if none is stored.
    async fn load(&self, key: &SessionKey) -> Result<SessionState>;

    /// Persist the state for `key`.
    async fn save(&self, key: &SessionKey, state: &SessionState) -> Result<()>;

    /// Remove the state for `key`. Removing a missing key is not an error.
    async fn destroy(&self, key: &SessionKey) -> Result<()>;

    /// Evict idle entries. Stores without expiry can ignore this.
    async fn sweep(&self) {}

    fn is_healthy(&self) -> bool {
        true
    }
}

/// In-process store backed by a moka cache.
///
/// Entries idle longer than the session TTL are evicted.
#[derive(Clone)]
pub struct MemorySessionStore {
    cache: Cache<SessionKey, SessionState>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_idle(ttl)
                .build(),
        }
    }

    /// Approximate number of stored sessions.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, key: &SessionKey) -> Result<SessionState> {
        Ok(self.cache.get(key).await.unwrap_or_default())
    }

    async fn save(&self, key: &SessionKey, state: &SessionState) -> Result<()> {
        if state.is_empty() {
            // Nothing worth keeping
            self.cache.invalidate(key).await;
        } else {
            self.cache.insert(key.clone(), state.clone()).await;
        }
        Ok(())
    }

    async fn destroy(&self, key: &SessionKey) -> Result<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn sweep(&self) {
        self.cache.run_pending_tasks().await;
        metrics().sessions_stored.set(self.len());
        debug!(sessions = self.len(), "Session store swept");
    }
}
