//! Per-session change-event fan-out.
//!
//! Watchers subscribe to a session id and receive a `SessionChanged` ping
//! after every arbiter commit (and after a join flips the session active).
//! Delivery is best-effort: the event carries no state, subscribers re-read;
//! watchers whose channel is gone are pruned on the next broadcast. Events
//! for one session arrive in commit order.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};
use uuid::Uuid;

/// The change event. Deliberately state-free.
#[derive(Debug, Clone, Serialize)]
pub struct SessionChanged {
    pub session_id: String,
}

/// Map of watcher token to its channel, for a specific session id.
type WatcherMap = DashMap<Uuid, UnboundedSender<SessionChanged>>;

pub struct SessionWatchers {
    watchers: DashMap<String, WatcherMap>,
    active_watchers: AtomicUsize,
}

impl SessionWatchers {
    pub fn new() -> Self {
        Self {
            watchers: DashMap::new(),
            active_watchers: AtomicUsize::new(0),
        }
    }

    /// Register a watcher for `session_id`. The returned token identifies the
    /// subscription for `unsubscribe`.
    pub fn subscribe(&self, session_id: &str) -> (Uuid, UnboundedReceiver<SessionChanged>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = Uuid::new_v4();
        let entry = self.watchers.entry(session_id.to_string()).or_default();
        entry.insert(token, tx);

        let active = self.active_watchers.fetch_add(1, Ordering::Relaxed) + 1;
        info!(session_id, active_watchers = active, "watcher subscribed");

        (token, rx)
    }

    pub fn unsubscribe(&self, session_id: &str, token: Uuid) {
        let (was_present, now_empty) = match self.watchers.get_mut(session_id) {
            Some(entry) => {
                let was_present = entry.remove(&token).is_some();
                let now_empty = entry.is_empty();
                // Guard dropped here when entry goes out of scope
                (was_present, now_empty)
            }
            _ => (false, false),
        };

        if now_empty {
            self.watchers.remove(session_id);
        }

        if was_present {
            let previous = self.active_watchers.load(Ordering::Relaxed);
            if previous > 0 {
                self.active_watchers.fetch_sub(1, Ordering::Relaxed);
            }
            info!(
                session_id,
                token = %token,
                active_watchers = previous.saturating_sub(1),
                "watcher unsubscribed"
            );
        }
    }

    /// Broadcast a change event to every current watcher of `session_id`.
    ///
    /// The subscriber list is copied under the map guard and the sends happen
    /// outside it, so a slow consumer never blocks registration. Send errors
    /// mean the receiver is gone; those watchers are pruned.
    pub fn notify(&self, session_id: &str) {
        let targets: Vec<(Uuid, UnboundedSender<SessionChanged>)> = match self
            .watchers
            .get(session_id)
        {
            Some(entry) => entry
                .iter()
                .map(|kv| (*kv.key(), kv.value().clone()))
                .collect(),
            None => return,
        };

        let event = SessionChanged {
            session_id: session_id.to_string(),
        };

        let mut dead: Vec<Uuid> = Vec::new();
        for (token, tx) in targets {
            if tx.send(event.clone()).is_err() {
                dead.push(token);
            }
        }

        for token in dead {
            debug!(session_id, token = %token, "pruning dropped watcher");
            self.unsubscribe(session_id, token);
        }
    }

    /// Current number of registered watchers across all sessions.
    pub fn active_watchers(&self) -> usize {
        self.active_watchers.load(Ordering::Relaxed)
    }
}

impl Default for SessionWatchers {
    fn default() -> Self {
        Self::new()
    }
}
