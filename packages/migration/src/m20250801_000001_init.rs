use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Agents {
    Table,
    AgentId,
    BearerSecret,
    ClaimSecret,
    Claimed,
    CreatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    SessionId,
    Template,
    State,
    Status,
    Tick,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Participants {
    Table,
    SessionId,
    AgentId,
    Role,
}

#[derive(Iden)]
enum Actions {
    Table,
    ActionId,
    SessionId,
    AgentId,
    Role,
    Action,
    Tick,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Agents::Table)
                    .col(
                        ColumnDef::new(Agents::AgentId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Agents::BearerSecret).string().null())
                    .col(ColumnDef::new(Agents::ClaimSecret).string().not_null())
                    .col(
                        ColumnDef::new(Agents::Claimed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Agents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_agents_bearer_secret")
                    .table(Agents::Table)
                    .col(Agents::BearerSecret)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_agents_claim_secret")
                    .table(Agents::Table)
                    .col(Agents::ClaimSecret)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .col(
                        ColumnDef::new(Sessions::SessionId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::Template).string().not_null())
                    .col(ColumnDef::new(Sessions::State).text().not_null())
                    .col(ColumnDef::new(Sessions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Sessions::Tick)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .col(ColumnDef::new(Participants::SessionId).string().not_null())
                    .col(ColumnDef::new(Participants::AgentId).string().not_null())
                    .col(ColumnDef::new(Participants::Role).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(Participants::SessionId)
                            .col(Participants::AgentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_session")
                            .from(Participants::Table, Participants::SessionId)
                            .to(Sessions::Table, Sessions::SessionId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_agent")
                            .from(Participants::Table, Participants::AgentId)
                            .to(Agents::Table, Agents::AgentId)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_participants_session_role")
                    .table(Participants::Table)
                    .col(Participants::SessionId)
                    .col(Participants::Role)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actions::Table)
                    .col(
                        ColumnDef::new(Actions::ActionId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Actions::SessionId).string().not_null())
                    .col(ColumnDef::new(Actions::AgentId).string().not_null())
                    .col(ColumnDef::new(Actions::Role).string().not_null())
                    .col(ColumnDef::new(Actions::Action).text().not_null())
                    .col(ColumnDef::new(Actions::Tick).big_integer().not_null())
                    .col(
                        ColumnDef::new(Actions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actions_session")
                            .from(Actions::Table, Actions::SessionId)
                            .to(Sessions::Table, Sessions::SessionId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actions_agent")
                            .from(Actions::Table, Actions::AgentId)
                            .to(Agents::Table, Agents::AgentId)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Exactly one state transition per (session, tick).
        manager
            .create_index(
                Index::create()
                    .name("ux_actions_session_tick")
                    .table(Actions::Table)
                    .col(Actions::SessionId)
                    .col(Actions::Tick)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Actions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Agents::Table).to_owned())
            .await?;
        Ok(())
    }
}
