//! Agent repository functions for the identity store.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::agents_sea as agents_adapter;
use crate::entities::agents;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use crate::adapters::agents_sea::{AgentClaim, AgentCreate};

/// Agent domain model. Rows are effectively immutable after claim.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub agent_id: String,
    pub bearer_secret: Option<String>,
    pub claim_secret: String,
    pub claimed: bool,
    pub created_at: time::OffsetDateTime,
}

impl From<agents::Model> for Agent {
    fn from(model: agents::Model) -> Self {
        Self {
            agent_id: model.agent_id,
            bearer_secret: model.bearer_secret,
            claim_secret: model.claim_secret,
            claimed: model.claimed,
            created_at: model.created_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    agent_id: &str,
) -> Result<Option<Agent>, DomainError> {
    let agent = agents_adapter::find_by_id(conn, agent_id).await?;
    Ok(agent.map(Agent::from))
}

/// Find agent by id or return a not-found error.
pub async fn require_agent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    agent_id: &str,
) -> Result<Agent, DomainError> {
    find_by_id(conn, agent_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Agent, format!("agent '{agent_id}' not found"))
    })
}

/// Resolve a bearer secret; `None` when it matches no claimed agent.
pub async fn find_by_bearer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    bearer_secret: &str,
) -> Result<Option<Agent>, DomainError> {
    let agent = agents_adapter::find_by_bearer(conn, bearer_secret).await?;
    Ok(agent.map(Agent::from))
}

pub async fn create_unclaimed(
    txn: &DatabaseTransaction,
    dto: AgentCreate,
) -> Result<Agent, DomainError> {
    let agent = agents_adapter::create_unclaimed(txn, dto).await?;
    Ok(Agent::from(agent))
}

/// Exchange a claim secret for a bearer secret, exactly once.
pub async fn claim(txn: &DatabaseTransaction, dto: AgentClaim) -> Result<Agent, DomainError> {
    let claimed = agents_adapter::claim(txn, dto).await?;
    claimed.map(Agent::from).ok_or_else(|| {
        DomainError::unauthorized("invalid claim secret, or agent already claimed")
    })
}
