//! Billing domain: plans, subscriptions, payments and Stripe webhooks.
//!
//! # Module Structure
//!
//! - `plan` - MembershipPlan and BillingInterval
//! - `subscription_status` - SubscriptionStatus state machine
//! - `subscription` - Subscription aggregate
//! - `payment` - PaymentRecord and PaymentStatus
//! - `stripe_event` / `webhook_*` - signed webhook intake

mod payment;
mod plan;
pub mod stripe_event;
mod subscription;
mod subscription_status;
mod webhook_errors;
mod webhook_processor;
mod webhook_verifier;

pub use payment::{InvoiceRef, PaymentRecord, PaymentStatus};
pub use plan::{BillingInterval, MembershipPlan, PlanInput};
pub use stripe_event::{
    CheckoutSessionObject, InvoiceObject, StripeEvent, StripeEventData, StripeEventType,
    SubscriptionObject,
};
pub use subscription::{BillingPeriod, Subscription};
pub use subscription_status::SubscriptionStatus;
pub use webhook_errors::WebhookError;
pub use webhook_processor::{IdempotentWebhookProcessor, WebhookDispatcher, WebhookEventHandler};
pub use webhook_verifier::{
    signature_header, SignatureHeader, StripeWebhookVerifier, MAX_CLOCK_SKEW_SECS,
    MAX_EVENT_AGE_SECS,
};
