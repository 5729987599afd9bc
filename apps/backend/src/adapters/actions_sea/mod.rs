//! SeaORM adapter for the append-only action log. Insert and read, nothing
//! else; log rows are immutable by construction.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::actions;

pub mod dto;

pub use dto::ActionAppend;

pub async fn append<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ActionAppend,
) -> Result<actions::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let action_active = actions::ActiveModel {
        action_id: Set(dto.action_id),
        session_id: Set(dto.session_id),
        agent_id: Set(dto.agent_id),
        role: Set(dto.role),
        action: Set(dto.action),
        tick: Set(dto.tick),
        created_at: Set(now),
    };

    action_active.insert(conn).await
}

pub async fn find_all_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
) -> Result<Vec<actions::Model>, sea_orm::DbErr> {
    actions::Entity::find()
        .filter(actions::Column::SessionId.eq(session_id))
        .order_by_asc(actions::Column::Tick)
        .all(conn)
        .await
}
