pub use sea_orm::{ConnectionTrait, DatabaseConnection};
pub use sea_orm_migration::prelude::*;

mod m20250801_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250801_000001_init::Migration)]
    }
}

#[derive(Debug, Clone)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Status,
}

/// Migration entrypoint shared by the server binary and the tests.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let defined = Migrator::migrations().len();
    let applied = match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => migrations.len().to_string(),
        Err(_) => "?".to_string(),
    };

    tracing::info!(
        "▶ cmd={command:?}  backend={:?}  {defined} migration(s) defined, {applied} applied",
        db.get_database_backend(),
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            tracing::info!("✅ {command:?} OK");
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ {command:?} failed: {e}");
            Err(e)
        }
    }
}
