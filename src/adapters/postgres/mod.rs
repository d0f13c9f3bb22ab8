//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresProfileRepository` - member profiles and roles
//! - `PostgresLocationRepository`, `PostgresGymRepository`,
//!   `PostgresClassTypeRepository` - the catalog
//! - `PostgresPlanRepository`, `PostgresSubscriptionRepository`,
//!   `PostgresPaymentHistoryRepository` - billing rows
//! - `PostgresWebhookEventRepository` - webhook idempotency
//! - `PostgresDashboardReader` - admin aggregates

mod billing_repository;
mod catalog_repository;
mod dashboard_reader;
mod error;
mod profile_repository;
mod webhook_event_repository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

pub use billing_repository::{
    PostgresPaymentHistoryRepository, PostgresPlanRepository, PostgresSubscriptionRepository,
};
pub use catalog_repository::{
    PostgresClassTypeRepository, PostgresGymRepository, PostgresLocationRepository,
};
pub use dashboard_reader::PostgresDashboardReader;
pub use profile_repository::PostgresProfileRepository;
pub use webhook_event_repository::PostgresWebhookEventRepository;

/// Open a connection pool sized by `config`, running migrations if asked.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await?;

    if config.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    Ok(pool)
}
