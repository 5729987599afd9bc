use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::TemplateRegistry;
use crate::locks::SessionLocks;
use crate::notify::SessionWatchers;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional so error paths stay testable)
    db: Option<DatabaseConnection>,
    /// Immutable template-id → implementation map, populated at startup
    pub templates: Arc<TemplateRegistry>,
    /// Keyed per-session exclusive locks for the arbiter's critical section
    pub locks: Arc<SessionLocks>,
    /// Per-session change-event fan-out
    pub watchers: Arc<SessionWatchers>,
}

impl AppState {
    fn new_inner(db: Option<DatabaseConnection>) -> Self {
        Self {
            db,
            templates: Arc::new(TemplateRegistry::builtin()),
            locks: Arc::new(SessionLocks::new()),
            watchers: Arc::new(SessionWatchers::new()),
        }
    }

    /// Create a new AppState with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self::new_inner(Some(db))
    }

    /// Create a new AppState with no database connection
    pub fn new_without_db() -> Self {
        Self::new_inner(None)
    }

    /// Get a reference to the database connection if available
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
