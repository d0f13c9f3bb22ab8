//! Payment provider port for external payment processing.
//!
//! Defines the contract for the billing gateway (Stripe). Card entry,
//! plan changes and invoice dunning happen on the provider's hosted pages;
//! this service only starts sessions, reads subscriptions and retries invoices.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::billing::{BillingPeriod, SubscriptionStatus};
use crate::domain::foundation::{DomainError, ErrorCode, PlanId, ProfileId, Timestamp};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer tagged with the profile id. Returns the customer id.
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<String, PaymentError>;

    /// Current provider view of a subscription.
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, PaymentError>;

    /// Cancel a subscription.
    ///
    /// If `at_period_end` is true, access continues until the period ends.
    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<ProviderSubscription, PaymentError>;

    /// Create a hosted checkout session in subscription mode.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<HostedSession, PaymentError>;

    /// Create a billing portal session for self-service management.
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<HostedSession, PaymentError>;

    /// Attempt to collect an open invoice now.
    ///
    /// A declined card is reported as `Ok` with `paid == false` so callers
    /// can record the attempt.
    async fn pay_invoice(&self, invoice_id: &str) -> Result<InvoicePayment, PaymentError>;
}

/// Request to create a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Stored as `metadata[profile_id]`.
    pub profile_id: ProfileId,
    pub email: String,
    pub name: Option<String>,
}

/// Request to create a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    pub customer_id: String,
    pub price_id: String,
    /// Sent as `client_reference_id` and metadata.
    pub profile_id: ProfileId,
    /// Sent as metadata on both the session and the subscription.
    pub plan_id: PlanId,
    pub success_url: String,
    pub cancel_url: String,
}

/// Redirect target for a hosted provider page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedSession {
    pub id: String,
    pub url: String,
}

/// Subscription as the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSubscription {
    pub id: String,
    pub customer_id: String,
    pub status: SubscriptionStatus,
    pub period: Option<BillingPeriod>,
    pub cancel_at_period_end: bool,
}

/// Outcome of a manual invoice collection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePayment {
    pub invoice_id: String,
    pub paid: bool,
    pub amount_paid: i64,
    pub attempt_count: i32,
    /// When the provider will try again on its own, if ever.
    pub next_payment_attempt: Option<Timestamp>,
    pub failure_message: Option<String>,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(
            PaymentErrorCode::NotFound,
            format!("{} not found", resource),
        )
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::CardDeclined | PaymentErrorCode::InsufficientFunds => {
                ErrorCode::PaymentRequired
            }
            PaymentErrorCode::NotFound => ErrorCode::NotFound,
            PaymentErrorCode::InvalidRequest => ErrorCode::ValidationFailed,
            _ => ErrorCode::ExternalServiceError,
        };

        let mut domain = DomainError::new(code, err.message);
        if let Some(provider_code) = err.provider_code {
            domain = domain.with_detail("provider_code", provider_code);
        }
        domain
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API key rejected.
    AuthenticationError,

    CardDeclined,

    InsufficientFunds,

    /// Resource not found.
    NotFound,

    RateLimitExceeded,

    /// Request rejected as malformed.
    InvalidRequest,

    /// Any other provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InsufficientFunds => "insufficient_funds",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
