//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `ProfileRepository` - member profiles and roles
//! - `LocationRepository`, `GymRepository`, `ClassTypeRepository` - catalog
//! - `PlanRepository`, `SubscriptionRepository`, `PaymentHistoryRepository` - billing
//! - `DashboardReader` - aggregate counts for the admin overview
//! - `WebhookEventRepository` - Stripe webhook idempotency tracking
//!
//! ## External Service Ports
//!
//! - `SessionValidator` - bearer token validation
//! - `IdentityProvider` - sign-up, sign-in and password flows
//! - `PaymentProvider` - checkout, portal, subscription and invoice calls

mod billing_repository;
mod catalog_repository;
mod dashboard_reader;
mod identity_provider;
mod payment_provider;
mod profile_repository;
mod session_validator;
mod webhook_event_repository;

pub use billing_repository::{PaymentHistoryRepository, PlanRepository, SubscriptionRepository};
pub use catalog_repository::{ClassTypeRepository, GymRepository, LocationRepository};
pub use dashboard_reader::DashboardReader;
pub use identity_provider::{AuthSession, IdentityError, IdentityProvider, IdentityUser};
pub use payment_provider::{
    CreateCheckoutRequest, CreateCustomerRequest, HostedSession, InvoicePayment, PaymentError,
    PaymentErrorCode, PaymentProvider, ProviderSubscription,
};
pub use profile_repository::ProfileRepository;
pub use session_validator::SessionValidator;
pub use webhook_event_repository::{
    SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookOutcome, WebhookResult,
};
