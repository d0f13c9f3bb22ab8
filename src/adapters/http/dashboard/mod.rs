//! HTTP adapter for dashboard reads.
//!
//! - `GET /api/dashboard` - Member overview
//! - `GET /api/admin/stats` - Headline counts for admins

pub mod handlers;
pub mod routes;

pub use routes::{admin_stats_routes, dashboard_routes};
