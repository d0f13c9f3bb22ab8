//! HTTP adapter for billing endpoints.
//!
//! ## Public
//! - `GET /api/plans` - Active membership plans
//!
//! ## Member
//! - `GET /api/billing/subscription` - Current subscription, or null
//! - `GET /api/billing/payments?limit=` - Payment history, newest first
//! - `POST /api/billing/checkout` - Start a hosted checkout for a plan
//! - `POST /api/billing/portal` - Open the hosted billing portal
//! - `POST /api/billing/cancel` - Cancel at the end of the period
//!
//! ## Admin
//! - `GET/POST /api/admin/plans`, `PUT /api/admin/plans/:id`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{admin_plan_routes, billing_routes, plan_routes};
