//! Identity store: issue agent identities, exchange claim secrets for bearer
//! secrets, resolve bearers to agents.
//!
//! Registration is deliberately split in two. The registration output may be
//! observed (a link pasted in a public channel); the one-shot claim ensures
//! exactly one party ends up holding the bearer secret, and the registering
//! party never sees a bearer secret it did not claim itself.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use tracing::info;
use ulid::Ulid;

use crate::error::AppError;
use crate::repos::agents::{self, Agent, AgentClaim, AgentCreate};
use crate::utils::secret::generate_secret;

/// Output of registration: the claim secret, never a bearer.
#[derive(Debug, Clone)]
pub struct RegisteredAgent {
    pub agent_id: String,
    pub claim_secret: String,
}

/// Output of a successful claim.
#[derive(Debug, Clone)]
pub struct ClaimedAgent {
    pub agent_id: String,
    pub bearer_secret: String,
}

#[derive(Default)]
pub struct IdentityService;

impl IdentityService {
    /// Insert a new agent row in the unclaimed state.
    pub async fn register(&self, txn: &DatabaseTransaction) -> Result<RegisteredAgent, AppError> {
        let dto = AgentCreate {
            agent_id: Ulid::new().to_string(),
            claim_secret: generate_secret(),
        };
        let agent = agents::create_unclaimed(txn, dto).await?;

        info!(agent_id = %agent.agent_id, "agent registered");

        Ok(RegisteredAgent {
            agent_id: agent.agent_id,
            claim_secret: agent.claim_secret,
        })
    }

    /// Exchange the claim secret for a fresh bearer secret. Atomic and
    /// single-use: a second claim with the same secret is unauthorized.
    pub async fn claim(
        &self,
        txn: &DatabaseTransaction,
        agent_id: &str,
        claim_secret: &str,
    ) -> Result<ClaimedAgent, AppError> {
        let dto = AgentClaim {
            agent_id: agent_id.to_string(),
            claim_secret: claim_secret.to_string(),
            bearer_secret: generate_secret(),
        };
        let agent = agents::claim(txn, dto).await?;

        info!(agent_id = %agent.agent_id, "agent claimed");

        let bearer_secret = agent.bearer_secret.ok_or_else(|| {
            AppError::internal(
                crate::errors::ErrorCode::Internal,
                "claimed agent row is missing its bearer secret",
            )
        })?;

        Ok(ClaimedAgent {
            agent_id: agent.agent_id,
            bearer_secret,
        })
    }

    /// Resolve a bearer secret to its agent; `None` when it resolves to
    /// nothing. Empty bearers never resolve.
    pub async fn resolve<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        bearer_secret: &str,
    ) -> Result<Option<Agent>, AppError> {
        if bearer_secret.is_empty() {
            return Ok(None);
        }
        Ok(agents::find_by_bearer(conn, bearer_secret).await?)
    }
}
