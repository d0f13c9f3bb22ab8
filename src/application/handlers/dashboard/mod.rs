//! Dashboard query handlers.
//!
//! Read-only handlers for the member home page and the admin overview.

mod admin_stats;
mod member_dashboard;

pub use admin_stats::GetAdminStatsHandler;
pub use member_dashboard::{GetMemberDashboardHandler, GetMemberDashboardQuery};
