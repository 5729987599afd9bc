use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directives applied when `RUST_LOG` is not set: the engine logs at info,
/// the database stack only complains.
const QUIET_DEPENDENCIES: &str = "sqlx=warn,sea_orm=warn";

/// Flattened JSON events on stdout. `RUST_LOG` overrides the defaults
/// wholesale.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .parse_lossy(QUIET_DEPENDENCIES)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true).with_target(false))
        .init();
}
