//! BaaS auth REST adapter.
//!
//! Implements the `IdentityProvider` port against the hosted auth service's
//! REST API (`{url}/auth/v1/...`). Every request carries the project's anon
//! key in the `apikey` header; password changes additionally carry the
//! caller's own access token.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::foundation::ProfileId;
use crate::ports::{AuthSession, IdentityError, IdentityProvider, IdentityUser};

/// Connection settings for the auth REST API.
#[derive(Clone)]
pub struct BaasAuthConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    base_url: String,

    /// Public anon key sent as `apikey`.
    anon_key: SecretString,

    timeout: Duration,
}

impl BaasAuthConfig {
    pub fn new(base_url: impl Into<String>, anon_key: SecretString) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// REST client for the hosted auth service.
pub struct BaasIdentityClient {
    config: BaasAuthConfig,
    http_client: reqwest::Client,
}

impl BaasIdentityClient {
    pub fn new(config: BaasAuthConfig) -> Result<Self, IdentityError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IdentityError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let anon_key = self.config.anon_key.expose_secret();
        self.http_client
            .request(method, self.config.endpoint(path))
            .header("apikey", anon_key)
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<reqwest::Response, IdentityError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Auth service request failed");
            IdentityError::Unavailable(e.to_string())
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let err = map_error_response(status, &body);
        match &err {
            IdentityError::Unavailable(_) => {
                tracing::error!(operation, %status, "Auth service returned an error")
            }
            _ => tracing::debug!(operation, %status, error = %err, "Auth service rejected request"),
        }
        Err(err)
    }
}

/// User object returned by the auth service.
#[derive(Debug, Deserialize)]
struct AuthUserBody {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl AuthUserBody {
    fn into_identity(self, fallback_email: &str) -> IdentityUser {
        IdentityUser {
            id: ProfileId::from_uuid(self.id),
            email: self.email.unwrap_or_else(|| fallback_email.to_string()),
        }
    }
}

/// Sign-up answers with a session when auto-confirm is on and with the bare
/// user when email confirmation is pending.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session { user: AuthUserBody },
    User(AuthUserBody),
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    #[serde(default = "default_token_type")]
    token_type: String,
    user: AuthUserBody,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Error body; older deployments use `error`/`error_description`, newer
/// ones `error_code`/`msg`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn map_error_response(status: StatusCode, body: &str) -> IdentityError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return IdentityError::Unavailable(format!("auth service returned {}", status));
    }

    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed
        .error_code
        .as_deref()
        .or(parsed.error.as_deref())
        .unwrap_or_default();
    let message = parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .unwrap_or_else(|| format!("auth service returned {}", status));

    match code {
        "invalid_grant" | "invalid_credentials" => IdentityError::InvalidCredentials,
        "user_already_exists" | "email_exists" => IdentityError::AlreadyRegistered,
        _ if message.to_ascii_lowercase().contains("already registered") => {
            IdentityError::AlreadyRegistered
        }
        _ if status == StatusCode::UNAUTHORIZED => IdentityError::InvalidCredentials,
        _ => IdentityError::Rejected(message),
    }
}

#[async_trait]
impl IdentityProvider for BaasIdentityClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<IdentityUser, IdentityError> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "full_name": full_name },
        });
        let response = self
            .send(
                self.request(reqwest::Method::POST, "signup").json(&body),
                "sign_up",
            )
            .await?;

        let parsed: SignUpBody = response
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("Invalid sign-up response: {}", e)))?;
        let user = match parsed {
            SignUpBody::Session { user } | SignUpBody::User(user) => user,
        };

        tracing::info!(user_id = %user.id, "Account registered");
        Ok(user.into_identity(email))
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AuthSession, IdentityUser), IdentityError> {
        let response = self
            .send(
                self.request(reqwest::Method::POST, "token")
                    .query(&[("grant_type", "password")])
                    .json(&json!({ "email": email, "password": password })),
                "sign_in",
            )
            .await?;

        let token: TokenBody = response
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("Invalid token response: {}", e)))?;

        let session = AuthSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
            token_type: token.token_type,
        };
        Ok((session, token.user.into_identity(email)))
    }

    async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), IdentityError> {
        self.send(
            self.request(reqwest::Method::POST, "recover")
                .query(&[("redirect_to", redirect_to)])
                .json(&json!({ "email": email })),
            "request_password_reset",
        )
        .await?;
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        self.send(
            self.request(reqwest::Method::PUT, "user")
                .bearer_auth(access_token)
                .json(&json!({ "password": new_password })),
            "update_password",
        )
        .await?;
        Ok(())
    }
}

impl std::fmt::Debug for BaasIdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaasIdentityClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
