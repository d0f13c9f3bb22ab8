//! In-memory port implementations for tests and local development.
//!
//! Each store mirrors the uniqueness and reference rules of the Postgres
//! schema so handler tests see the same `Conflict`/`NotFound` behavior.

mod billing;
mod catalog;
mod dashboard;
mod profiles;
mod webhook_events;

pub use billing::{
    InMemoryPaymentHistoryRepository, InMemoryPlanRepository, InMemorySubscriptionRepository,
};
pub use catalog::InMemoryCatalog;
pub use dashboard::InMemoryDashboardReader;
pub use profiles::InMemoryProfileRepository;
pub use webhook_events::InMemoryWebhookEventRepository;
