//! SeaORM adapter for session rows.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{participants, sessions};
use crate::errors::domain::OPTIMISTIC_LOCK_SENTINEL;

pub mod dto;

pub use dto::{SessionAdvance, SessionCreate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
) -> Result<Option<sessions::Model>, sea_orm::DbErr> {
    sessions::Entity::find_by_id(session_id.to_string())
        .one(conn)
        .await
}

/// Sessions the agent participates in, most recently updated first.
pub async fn find_all_for_agent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    agent_id: &str,
) -> Result<Vec<sessions::Model>, sea_orm::DbErr> {
    sessions::Entity::find()
        .join(JoinType::InnerJoin, sessions::Relation::Participants.def())
        .filter(participants::Column::AgentId.eq(agent_id))
        .order_by_desc(sessions::Column::UpdatedAt)
        .all(conn)
        .await
}

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionCreate,
) -> Result<sessions::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let session_active = sessions::ActiveModel {
        session_id: Set(dto.session_id),
        template: Set(dto.template),
        state: Set(dto.state),
        status: Set(dto.status),
        tick: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    session_active.insert(conn).await
}

/// Commit an accepted state transition with the tick compare-and-set.
///
/// Zero rows affected means either the session vanished or a concurrent
/// writer advanced the tick first; the two are distinguished so the caller
/// can surface the right error.
pub async fn advance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionAdvance,
) -> Result<sessions::Model, sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();

    let result = sessions::Entity::update_many()
        .col_expr(sessions::Column::State, Expr::val(dto.state).into())
        .col_expr(sessions::Column::Status, Expr::val(dto.status).into())
        .col_expr(
            sessions::Column::Tick,
            Expr::col(sessions::Column::Tick).add(1),
        )
        .col_expr(sessions::Column::UpdatedAt, Expr::val(now).into())
        .filter(sessions::Column::SessionId.eq(dto.session_id.clone()))
        .filter(sessions::Column::Tick.eq(dto.expected_tick))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let exists = sessions::Entity::find_by_id(dto.session_id.clone())
            .one(conn)
            .await?
            .is_some();
        if exists {
            return Err(sea_orm::DbErr::Custom(format!(
                "{OPTIMISTIC_LOCK_SENTINEL}: session was advanced by another transaction"
            )));
        }
        return Err(sea_orm::DbErr::RecordNotFound(
            "session not found".to_string(),
        ));
    }

    sessions::Entity::find_by_id(dto.session_id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("session not found".to_string()))
}

/// Flip a waiting session's status without touching state or tick
/// (join filled the last open slot).
pub async fn set_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
    status: sessions::SessionStatus,
) -> Result<sessions::Model, sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();

    let result = sessions::Entity::update_many()
        .col_expr(sessions::Column::Status, Expr::val(status).into())
        .col_expr(sessions::Column::UpdatedAt, Expr::val(now).into())
        .filter(sessions::Column::SessionId.eq(session_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(
            "session not found".to_string(),
        ));
    }

    sessions::Entity::find_by_id(session_id.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("session not found".to_string()))
}
