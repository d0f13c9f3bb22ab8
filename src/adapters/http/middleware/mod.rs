//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `auth` - Bearer token validation and the `RequireAuth` extractor
//! - `admin` - Admin role guard for `/api/admin`

pub mod admin;
pub mod auth;

pub use admin::{require_admin, AdminUser};
pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAuth};
