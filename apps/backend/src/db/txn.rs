use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseTransaction, TransactionTrait};

use super::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Execute a closure within a database transaction.
///
/// Begins a transaction, runs the closure, commits on `Ok`, rolls back on
/// `Err`. Multi-row operations inside the closure land as one unit or not
/// at all.
pub async fn with_txn<R, F>(state: &AppState, f: F) -> Result<R, AppError>
where
    // The closure takes a borrowed transaction and returns a boxed future
    // whose lifetime is tied to that borrow (no 'static requirements).
    F: for<'a> FnOnce(
            &'a DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<R, AppError>> + Send + 'a>>
        + Send,
{
    let db = require_db(state)?;

    let txn = db.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve original error
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
