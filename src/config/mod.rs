//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `ACADEMY_HUB` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use academy_hub::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod auth;
mod cron;
mod database;
mod error;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use cron::CronConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, site URL)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (hosted PostgreSQL)
    pub database: DatabaseConfig,

    /// Authentication configuration (BaaS auth)
    pub auth: AuthConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Cron endpoint configuration
    pub cron: CronConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ACADEMY_HUB` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ACADEMY_HUB__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ACADEMY_HUB__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ACADEMY_HUB")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.payment.validate()?;
        self.cron.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const MINIMAL_ENV: &[(&str, &str)] = &[
        ("ACADEMY_HUB__DATABASE__URL", "postgresql://test@localhost/test"),
        ("ACADEMY_HUB__AUTH__BAAS_URL", "https://project.example.co"),
        ("ACADEMY_HUB__AUTH__ANON_KEY", "anon-key"),
        (
            "ACADEMY_HUB__AUTH__JWT_SECRET",
            "super-secret-jwt-token-with-at-least-32-characters",
        ),
        ("ACADEMY_HUB__PAYMENT__STRIPE_API_KEY", "sk_test_xxx"),
        ("ACADEMY_HUB__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx"),
        ("ACADEMY_HUB__CRON__SECRET", "cron-secret-0123456789"),
    ];

    const OPTIONAL_ENV: &[&str] = &[
        "ACADEMY_HUB__SERVER__PORT",
        "ACADEMY_HUB__SERVER__ENVIRONMENT",
        "ACADEMY_HUB__CRON__MAX_PAYMENT_ATTEMPTS",
    ];

    fn set_minimal_env() {
        for (key, value) in MINIMAL_ENV {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in MINIMAL_ENV {
            env::remove_var(key);
        }
        for key in OPTIONAL_ENV {
            env::remove_var(key);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let result = load_with(&[]);

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.auth.jwt_audience, "authenticated");
        assert_eq!(config.cron.max_payment_attempts, 4);
    }

    #[test]
    fn test_validate_full_config() {
        let config = load_with(&[]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_is_production() {
        let config = load_with(&[("ACADEMY_HUB__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_values_override_defaults() {
        let config = load_with(&[
            ("ACADEMY_HUB__SERVER__PORT", "3000"),
            ("ACADEMY_HUB__CRON__MAX_PAYMENT_ATTEMPTS", "6"),
        ])
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cron.max_payment_attempts, 6);
    }

    #[test]
    fn test_missing_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        assert!(AppConfig::load().is_err());
    }
}
