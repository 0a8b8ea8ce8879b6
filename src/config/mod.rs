//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `LIVE_PRESENTER`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use live_presenter::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod engine;
mod error;
mod server;
mod tenancy;

pub use database::DatabaseConfig;
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use tenancy::TenancyConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL store. Absent means in-memory persistence.
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub tenancy: TenancyConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `LIVE_PRESENTER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `LIVE_PRESENTER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `LIVE_PRESENTER__TENANCY__DEFAULT_TENANT=acme` -> `tenancy.default_tenant`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LIVE_PRESENTER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.tenancy.validate()?;
        self.engine.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "LIVE_PRESENTER__SERVER__PORT",
        "LIVE_PRESENTER__SERVER__ENVIRONMENT",
        "LIVE_PRESENTER__DATABASE__URL",
        "LIVE_PRESENTER__TENANCY__DEFAULT_TENANT",
        "LIVE_PRESENTER__ENGINE__MAX_COMMIT_ATTEMPTS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn loads_with_no_variables_set() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.database.is_none());
        assert!(config.tenancy.default_tenant.is_none());
        assert_eq!(config.engine.max_commit_attempts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_sections_are_read() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("LIVE_PRESENTER__SERVER__PORT", "3000");
        env::set_var("LIVE_PRESENTER__SERVER__ENVIRONMENT", "production");
        env::set_var("LIVE_PRESENTER__DATABASE__URL", "postgres://app@localhost/live");
        env::set_var("LIVE_PRESENTER__TENANCY__DEFAULT_TENANT", "acme");
        env::set_var("LIVE_PRESENTER__ENGINE__MAX_COMMIT_ATTEMPTS", "8");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(
            config.database.as_ref().map(|d| d.url.as_str()),
            Some("postgres://app@localhost/live")
        );
        assert_eq!(config.tenancy.default_tenant.as_deref(), Some("acme"));
        assert_eq!(config.engine.max_commit_attempts, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_section_fails_validation() {
        let config = AppConfig {
            engine: EngineConfig {
                max_commit_attempts: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCommitAttempts));
    }
}
