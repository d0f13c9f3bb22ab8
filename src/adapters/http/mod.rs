//! HTTP adapter - axum routers, middleware and the JSON error mapping.
//!
//! Each feature has its own module with request DTOs, handlers and a
//! router; `router::build_router` assembles them behind the shared layers.

pub mod auth;
pub mod billing;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod middleware;
pub mod ops;
pub mod profile;
pub mod router;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use router::build_router;
pub use state::{AppState, HttpSettings};
