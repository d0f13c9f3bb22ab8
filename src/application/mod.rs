//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers change state; query handlers only read.

pub mod handlers;

pub use handlers::billing::{HandleStripeWebhookHandler, ProcessRetriesHandler, StripeWebhookDispatcher};
pub use handlers::dashboard::{GetAdminStatsHandler, GetMemberDashboardHandler};
pub use handlers::profile::{AuthorizeAdminHandler, GetProfileHandler};
