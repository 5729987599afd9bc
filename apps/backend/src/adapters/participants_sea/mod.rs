//! SeaORM adapter for participant bindings.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::participants;

pub async fn find_one<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
    agent_id: &str,
) -> Result<Option<participants::Model>, sea_orm::DbErr> {
    participants::Entity::find()
        .filter(participants::Column::SessionId.eq(session_id))
        .filter(participants::Column::AgentId.eq(agent_id))
        .one(conn)
        .await
}

pub async fn find_all_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
) -> Result<Vec<participants::Model>, sea_orm::DbErr> {
    participants::Entity::find()
        .filter(participants::Column::SessionId.eq(session_id))
        .all(conn)
        .await
}

/// Bind `agent_id` to `role`. The `(session_id, role)` unique index is the
/// last line of defense against two agents landing on the same role.
pub async fn add<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
    agent_id: &str,
    role: &str,
) -> Result<participants::Model, sea_orm::DbErr> {
    let participant_active = participants::ActiveModel {
        session_id: Set(session_id.to_string()),
        agent_id: Set(agent_id.to_string()),
        role: Set(role.to_string()),
    };

    participant_active.insert(conn).await
}
