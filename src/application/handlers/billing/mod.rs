//! Billing handlers.
//!
//! ## Commands
//! - Plan management (admin)
//! - Checkout, billing portal and cancellation (member)
//! - Stripe webhook intake
//! - Scheduled payment retries (cron)
//!
//! ## Queries
//! - Plan listing
//! - The caller's subscription and payment history

mod checkout;
mod handle_stripe_webhook;
mod plans;
mod process_retries;
pub(crate) mod stripe_webhooks;
mod subscription;

// Commands
pub use checkout::{
    BillingUrls, OpenBillingPortalHandler, StartCheckoutCommand, StartCheckoutHandler,
};
pub use handle_stripe_webhook::{HandleStripeWebhookCommand, HandleStripeWebhookHandler};
pub use plans::{CreatePlanHandler, UpdatePlanCommand, UpdatePlanHandler};
pub use process_retries::{ProcessRetriesHandler, RetryPolicy, RetryReport};
pub use subscription::CancelSubscriptionHandler;

// Queries
pub use plans::ListPlansHandler;
pub use subscription::{GetMySubscriptionHandler, ListMyPaymentsHandler, MAX_PAYMENTS_PAGE};

// Webhook routing
pub use stripe_webhooks::{
    CheckoutCompletedHandler, InvoicePaidHandler, InvoicePaymentFailedHandler,
    StripeWebhookDispatcher, SubscriptionDeletedHandler, SubscriptionUpdatedHandler,
};
