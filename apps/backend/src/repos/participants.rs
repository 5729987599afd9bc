//! Participant-binding repository functions.

use sea_orm::{ConnectionTrait, DatabaseTransaction, SqlErr};

use crate::adapters::participants_sea as participants_adapter;
use crate::entities::participants;
use crate::errors::domain::{ConflictKind, DomainError};

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub session_id: String,
    pub agent_id: String,
    pub role: String,
}

impl From<participants::Model> for Participant {
    fn from(model: participants::Model) -> Self {
        Self {
            session_id: model.session_id,
            agent_id: model.agent_id,
            role: model.role,
        }
    }
}

/// The agent's binding in this session, if any.
pub async fn find_for_agent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
    agent_id: &str,
) -> Result<Option<Participant>, DomainError> {
    let participant = participants_adapter::find_one(conn, session_id, agent_id).await?;
    Ok(participant.map(Participant::from))
}

pub async fn find_all_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
) -> Result<Vec<Participant>, DomainError> {
    let participants = participants_adapter::find_all_by_session(conn, session_id).await?;
    Ok(participants.into_iter().map(Participant::from).collect())
}

pub async fn add(
    txn: &DatabaseTransaction,
    session_id: &str,
    agent_id: &str,
    role: &str,
) -> Result<Participant, DomainError> {
    match participants_adapter::add(txn, session_id, agent_id, role).await {
        Ok(model) => Ok(Participant::from(model)),
        // A concurrent join slipping past the pre-checks lands on the
        // (session_id, role) unique index.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(DomainError::conflict(
                ConflictKind::RoleTaken,
                format!("role '{role}' is already bound in session '{session_id}'"),
            ))
        }
        Err(e) => Err(DomainError::from(e)),
    }
}
