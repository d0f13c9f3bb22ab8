//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations, grouped by
//! the area of the API they serve.

pub mod auth;
pub mod billing;
pub mod catalog;
pub mod dashboard;
pub mod profile;
