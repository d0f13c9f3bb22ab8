//! HTTP adapter for profile endpoints.
//!
//! - `GET /api/profile` - Caller's profile, created on first access
//! - `PATCH /api/profile` - Update name and phone
//! - `GET /api/admin/profiles` - All profiles (admin)
//! - `PUT /api/admin/profiles/:id/role` - Change a member's role (admin)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{admin_profile_routes, profile_routes};
