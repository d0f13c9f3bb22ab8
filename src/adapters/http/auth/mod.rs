//! HTTP adapter for authentication endpoints.
//!
//! - `POST /api/auth/sign-up` - Register and create the member profile
//! - `POST /api/auth/sign-in` - Exchange credentials for a session
//! - `POST /api/auth/password-reset` - Ask the auth service to send a reset email
//! - `POST /api/auth/password` - Change the caller's password

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::auth_routes;
