//! Endpoints called by machines rather than members.
//!
//! - `GET /health` - Liveness probe
//! - `POST /api/webhooks/stripe` - Signed Stripe events
//! - `POST /api/cron/process-retries` - Failed payment retry pass

pub mod cron;
pub mod health;
pub mod routes;
pub mod webhooks;

pub use routes::{cron_routes, health_routes, webhook_routes};
