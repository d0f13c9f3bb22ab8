//! Read-only port for dashboard aggregates.

use async_trait::async_trait;

use crate::domain::dashboard::AdminStats;
use crate::domain::foundation::DomainError;

#[async_trait]
pub trait DashboardReader: Send + Sync {
    /// Counts for the admin overview.
    async fn admin_stats(&self) -> Result<AdminStats, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn DashboardReader) {}
    }
}
