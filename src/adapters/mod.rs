//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - BaaS JWT validation and the auth REST client
//! - `http` - axum routers, middleware and error mapping
//! - `memory` - in-memory repositories for tests and local runs
//! - `postgres` - sqlx repositories over the hosted database
//! - `stripe` - Stripe REST client and a mock provider

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
