//! Helpers for integration tests. Not compiled out of the lib because the
//! integration suites link against the library crate.

use sea_orm::{ConnectOptions, Database};

use crate::state::AppState;

/// AppState over an in-memory SQLite database with the schema applied.
///
/// The pool is pinned to a single connection: each sqlite `:memory:`
/// connection is its own database, so more than one would shear the schema
/// from the data.
pub async fn sqlite_state() -> AppState {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");

    migration::migrate(&db, migration::MigrationCommand::Up)
        .await
        .expect("apply migrations");

    AppState::new(db)
}
