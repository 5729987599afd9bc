//! Session repository functions. This is the boundary where the opaque
//! persisted `state` document becomes a typed `SessionState` and back.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::sessions_sea as sessions_adapter;
use crate::adapters::sessions_sea::{SessionAdvance, SessionCreate};
use crate::domain::SessionState;
use crate::entities::sessions::{self, SessionStatus};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};

/// Session domain model with the state document already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_id: String,
    pub template: String,
    pub state: SessionState,
    pub status: SessionStatus,
    pub tick: i64,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

fn to_domain(model: sessions::Model) -> Result<Session, DomainError> {
    let doc: serde_json::Value = serde_json::from_str(&model.state).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("stored state is not valid JSON: {e}"),
        )
    })?;
    let state = SessionState::from_document(&model.template, &doc)?;
    Ok(Session {
        session_id: model.session_id,
        template: model.template,
        state,
        status: model.status,
        tick: model.tick,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn to_stored(state: &SessionState) -> Result<String, DomainError> {
    Ok(state.to_document()?.to_string())
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
) -> Result<Option<Session>, DomainError> {
    match sessions_adapter::find_by_id(conn, session_id).await? {
        Some(model) => Ok(Some(to_domain(model)?)),
        None => Ok(None),
    }
}

/// Find session by id or return a not-found error.
pub async fn require_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
) -> Result<Session, DomainError> {
    find_by_id(conn, session_id).await?.ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Session,
            format!("session '{session_id}' not found"),
        )
    })
}

/// Sessions the agent is bound to, most recently updated first.
pub async fn list_for_agent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    agent_id: &str,
) -> Result<Vec<Session>, DomainError> {
    let models = sessions_adapter::find_all_for_agent(conn, agent_id).await?;
    models.into_iter().map(to_domain).collect()
}

pub async fn create_session(
    txn: &DatabaseTransaction,
    session_id: &str,
    template: &str,
    state: &SessionState,
    status: SessionStatus,
) -> Result<Session, DomainError> {
    let dto = SessionCreate {
        session_id: session_id.to_string(),
        template: template.to_string(),
        state: to_stored(state)?,
        status,
    };
    let model = sessions_adapter::create_session(txn, dto).await?;
    to_domain(model)
}

/// Commit an accepted state transition. The store-level tick compare-and-set
/// backs up the arbiter's per-session lock; a mismatch maps to a conflict.
pub async fn advance(
    txn: &DatabaseTransaction,
    session_id: &str,
    expected_tick: i64,
    state: &SessionState,
    status: SessionStatus,
) -> Result<Session, DomainError> {
    let dto = SessionAdvance {
        session_id: session_id.to_string(),
        expected_tick,
        state: to_stored(state)?,
        status,
    };
    let model = sessions_adapter::advance(txn, dto).await?;
    to_domain(model)
}

pub async fn set_status(
    txn: &DatabaseTransaction,
    session_id: &str,
    status: SessionStatus,
) -> Result<Session, DomainError> {
    let model = sessions_adapter::set_status(txn, session_id, status).await?;
    to_domain(model)
}
