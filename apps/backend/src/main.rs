use actix_web::{web, App, HttpServer};
use backend::{config::AppConfig, routes, state::AppState, telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Load environment variables early
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("❌ {e}");
        std::process::exit(1);
    });

    let db = sea_orm::Database::connect(&config.database_url)
        .await
        .unwrap_or_else(|e| {
            eprintln!("❌ Failed to connect to database: {e}");
            std::process::exit(1);
        });

    migration::migrate(&db, migration::MigrationCommand::Up)
        .await
        .unwrap_or_else(|e| {
            eprintln!("❌ Failed to apply migrations: {e}");
            std::process::exit(1);
        });

    let app_state = AppState::new(db);

    println!("🚀 Starting Parlor engine on http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::configure)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
