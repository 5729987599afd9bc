use actix_web::{web, HttpResponse};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

async fn root() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("Parlor coordination engine 🎲"))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    store: StoreHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<String>,
}

#[derive(Serialize)]
struct StoreHealth {
    reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StoreHealth {
    fn up(schema_revision: Option<String>) -> Self {
        Self {
            reachable: true,
            schema_revision,
            error: None,
        }
    }

    fn down(error: impl ToString) -> Self {
        Self {
            reachable: false,
            schema_revision: None,
            error: Some(error.to_string()),
        }
    }
}

/// One round trip that both proves the store answers and reports the newest
/// applied schema revision. `None` means the migration table is empty.
async fn probe_store(db: &DatabaseConnection) -> Result<Option<String>, sea_orm::DbErr> {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        "SELECT MAX(version) AS revision FROM seaql_migrations".to_string(),
    );

    match db.query_one(stmt).await? {
        Some(row) => row.try_get::<Option<String>>("", "revision"),
        None => Ok(None),
    }
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let store = match require_db(&app_state) {
        Ok(db) => match probe_store(db).await {
            Ok(revision) => StoreHealth::up(revision),
            Err(e) => StoreHealth::down(e),
        },
        Err(e) => StoreHealth::down(e),
    };

    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store,
        time: OffsetDateTime::now_utc().format(&Rfc3339).ok(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health));
}
