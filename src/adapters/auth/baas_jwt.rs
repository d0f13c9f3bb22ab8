//! BaaS JWT adapter for access token validation.
//!
//! The hosted auth service signs session tokens with HS256 using the
//! project's JWT secret. This adapter implements the `SessionValidator` port
//! by checking, locally and without a network call:
//!
//! - **Signature**: HS256 with the configured secret
//! - **Audience (aud)**: must contain the configured audience (`authenticated`)
//! - **Expiry (exp)**: must be in the future
//! - **Subject (sub)**: must be a UUID; it becomes the `ProfileId`

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{AuthError, AuthenticatedUser, ProfileId};
use crate::ports::SessionValidator;

/// Claims carried by BaaS session tokens.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct BaasClaims {
    pub sub: String,
    pub aud: String,
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Validates BaaS-issued access tokens.
pub struct BaasJwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    audience: String,
}

impl BaasJwtValidator {
    pub fn new(jwt_secret: &SecretString, audience: impl Into<String>) -> Self {
        let audience = audience.into();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);

        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
            validation,
            audience,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<BaasClaims, AuthError> {
        decode::<BaasClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!(expected = %self.audience, "Invalid audience in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!(error = %e, "Token validation failed");
                    AuthError::InvalidToken
                }
            })
    }
}

#[async_trait]
impl SessionValidator for BaasJwtValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode_claims(token)?;

        let id = Uuid::parse_str(&claims.sub).map_err(|_| {
            tracing::warn!(sub = %claims.sub, "Token subject is not a UUID");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(
            ProfileId::from_uuid(id),
            claims.email.unwrap_or_default(),
            token,
        ))
    }
}

impl std::fmt::Debug for BaasJwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaasJwtValidator")
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}
