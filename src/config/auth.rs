//! Authentication configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (hosted BaaS auth)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Project URL; the auth REST API lives under `/auth/v1`
    pub baas_url: String,

    /// Public anon key sent as `apikey` on auth calls
    pub anon_key: String,

    /// HS256 secret the auth service signs access tokens with
    pub jwt_secret: String,

    /// Expected `aud` claim
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,

    /// Timeout for auth REST calls in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl AuthConfig {
    pub fn anon_key(&self) -> SecretString {
        SecretString::new(self.anon_key.clone())
    }

    pub fn jwt_secret(&self) -> SecretString {
        SecretString::new(self.jwt_secret.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate authentication configuration
    ///
    /// In production, requires HTTPS for the auth URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.baas_url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__BAAS_URL"));
        }
        if self.anon_key.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ANON_KEY"));
        }
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.jwt_secret.len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.jwt_audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_AUDIENCE"));
        }

        if *environment == Environment::Production && !self.baas_url.starts_with("https://") {
            return Err(ValidationError::AuthUrlMustBeHttps);
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            baas_url: String::new(),
            anon_key: String::new(),
            jwt_secret: String::new(),
            jwt_audience: default_jwt_audience(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}

fn default_request_timeout() -> u64 {
    10
}
