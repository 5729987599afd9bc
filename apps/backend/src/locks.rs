//! Keyed per-session locks.
//!
//! At most one submission holds a given session's lock at a time; different
//! sessions never contend. The guard covers the arbiter's load-validate-commit
//! window, which makes that window effectively serializable per session.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub struct SessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the exclusive lock for `session_id`, waiting if a concurrent
    /// submission holds it. Lock entries live for the life of the process;
    /// sessions are retained indefinitely anyway.
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}
