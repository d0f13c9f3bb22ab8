//! PostgreSQL implementation of DashboardReader.
//!
//! Aggregate counts for the admin overview, one grouped query per table.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::dashboard::AdminStats;
use crate::domain::foundation::DomainError;
use crate::ports::DashboardReader;

use super::error::db_error;

#[derive(Clone)]
pub struct PostgresDashboardReader {
    pool: PgPool,
}

impl PostgresDashboardReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn grouped_counts(
        &self,
        query: &'static str,
    ) -> Result<BTreeMap<String, i64>, DomainError> {
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("load dashboard counts", e))?;

        rows.iter()
            .map(|row| {
                let key: String = row
                    .try_get("key")
                    .map_err(|e| db_error("read dashboard counts", e))?;
                let count: i64 = row
                    .try_get("count")
                    .map_err(|e| db_error("read dashboard counts", e))?;
                Ok((key, count))
            })
            .collect()
    }
}

#[async_trait]
impl DashboardReader for PostgresDashboardReader {
    async fn admin_stats(&self) -> Result<AdminStats, DomainError> {
        let profiles_by_role = self
            .grouped_counts("SELECT role AS key, COUNT(*) AS count FROM profiles GROUP BY role")
            .await?;
        let subscriptions_by_status = self
            .grouped_counts(
                "SELECT status AS key, COUNT(*) AS count FROM subscriptions GROUP BY status",
            )
            .await?;

        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM locations WHERE is_active) AS active_locations,
                (SELECT COUNT(*) FROM gyms WHERE is_active) AS active_gyms,
                (SELECT COUNT(*) FROM class_types WHERE is_active) AS active_class_types
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("load catalog counts", e))?;

        let count = |column: &str| -> Result<i64, DomainError> {
            row.try_get(column)
                .map_err(|e| db_error("read catalog counts", e))
        };

        Ok(AdminStats {
            active_locations: count("active_locations")?,
            active_gyms: count("active_gyms")?,
            active_class_types: count("active_class_types")?,
            ..AdminStats::empty()
        }
        .with_counts(profiles_by_role, subscriptions_by_status))
    }
}
