//! SeaORM adapter for agent rows.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::agents;

pub mod dto;

pub use dto::{AgentClaim, AgentCreate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    agent_id: &str,
) -> Result<Option<agents::Model>, sea_orm::DbErr> {
    agents::Entity::find_by_id(agent_id.to_string())
        .one(conn)
        .await
}

/// Resolve a bearer secret to its agent. Only claimed rows carry a bearer
/// secret, but the filter keeps the invariant explicit.
pub async fn find_by_bearer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    bearer_secret: &str,
) -> Result<Option<agents::Model>, sea_orm::DbErr> {
    agents::Entity::find()
        .filter(agents::Column::BearerSecret.eq(bearer_secret))
        .filter(agents::Column::Claimed.eq(true))
        .one(conn)
        .await
}

pub async fn create_unclaimed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AgentCreate,
) -> Result<agents::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let agent_active = agents::ActiveModel {
        agent_id: Set(dto.agent_id),
        bearer_secret: Set(None),
        claim_secret: Set(dto.claim_secret),
        claimed: Set(false),
        created_at: Set(now),
    };

    agent_active.insert(conn).await
}

/// One-shot claim: flips the row to claimed and installs the bearer secret,
/// but only if the presented claim secret still matches an unclaimed row.
/// Returns `None` when nothing matched (wrong secret, wrong agent, or the
/// claim was already spent).
pub async fn claim<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AgentClaim,
) -> Result<Option<agents::Model>, sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    let result = agents::Entity::update_many()
        .col_expr(agents::Column::Claimed, Expr::val(true).into())
        .col_expr(
            agents::Column::BearerSecret,
            Expr::val(Some(dto.bearer_secret)).into(),
        )
        .filter(agents::Column::AgentId.eq(dto.agent_id.clone()))
        .filter(agents::Column::ClaimSecret.eq(dto.claim_secret))
        .filter(agents::Column::Claimed.eq(false))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Ok(None);
    }

    find_by_id(conn, &dto.agent_id).await
}
