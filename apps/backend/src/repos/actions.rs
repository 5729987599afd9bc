//! Action-log repository functions. Append and read only.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::actions_sea as actions_adapter;
use crate::entities::actions;
use crate::errors::domain::DomainError;

pub use crate::adapters::actions_sea::ActionAppend;

#[derive(Debug, Clone, PartialEq)]
pub struct ActionEntry {
    pub action_id: String,
    pub session_id: String,
    pub agent_id: String,
    pub role: String,
    pub action: String,
    pub tick: i64,
    pub created_at: time::OffsetDateTime,
}

impl From<actions::Model> for ActionEntry {
    fn from(model: actions::Model) -> Self {
        Self {
            action_id: model.action_id,
            session_id: model.session_id,
            agent_id: model.agent_id,
            role: model.role,
            action: model.action,
            tick: model.tick,
            created_at: model.created_at,
        }
    }
}

pub async fn append(txn: &DatabaseTransaction, dto: ActionAppend) -> Result<ActionEntry, DomainError> {
    let entry = actions_adapter::append(txn, dto).await?;
    Ok(ActionEntry::from(entry))
}

/// Log entries for a session, ascending by tick.
pub async fn list_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
) -> Result<Vec<ActionEntry>, DomainError> {
    let entries = actions_adapter::find_all_by_session(conn, session_id).await?;
    Ok(entries.into_iter().map(ActionEntry::from).collect())
}
