//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` and `IdentityProvider` ports:
//!
//! - `baas_jwt` - HS256 access token validation with the project JWT secret
//! - `baas_identity` - sign-up, sign-in and password calls to the auth REST API
//! - `mock` - Test implementations that don't require external services

mod baas_identity;
mod baas_jwt;
mod mock;

pub use baas_identity::{BaasAuthConfig, BaasIdentityClient};
pub use baas_jwt::BaasJwtValidator;
pub use mock::{MockIdentityProvider, MockSessionValidator};
