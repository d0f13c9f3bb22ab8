//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration:
//! - Customer creation
//! - Checkout and billing portal sessions
//! - Subscription lookup and cancellation
//! - Manual invoice collection for the retry pass
//!
//! Webhook verification lives in `domain::billing`, since it needs no HTTP
//! client.

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
