use actix_web::web;

use crate::error::AppError;

pub mod agents;
pub mod health;
pub mod sessions;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed JSON bodies surface in the standard error shape.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::invalid_request(err.to_string()).into()),
    );

    cfg.configure(health::configure_routes);
    cfg.configure(agents::configure_routes);
    cfg.configure(sessions::configure_routes);
}
