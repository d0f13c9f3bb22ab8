//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port against the Stripe REST API using
//! form-encoded requests authenticated with the secret key.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(secret_key);
//! let adapter = StripePaymentAdapter::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::billing::SubscriptionObject;
use crate::domain::foundation::Timestamp;
use crate::ports::{
    CreateCheckoutRequest, CreateCustomerRequest, HostedSession, InvoicePayment, PaymentError,
    PaymentErrorCode, PaymentProvider, ProviderSubscription,
};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    timeout: Duration,
}

impl StripeConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: "https://api.stripe.com".to_string(),
            timeout: Duration::from_secs(20),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base_url, path)
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, self.config.url(path))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
    }

    /// Sends a request and decodes a successful body as `T`.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<T, PaymentError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Stripe request failed");
            PaymentError::network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = map_error_response(status, &body);
            match err.code {
                PaymentErrorCode::CardDeclined
                | PaymentErrorCode::InsufficientFunds
                | PaymentErrorCode::NotFound => {
                    tracing::info!(operation, %status, error = %err, "Stripe rejected request")
                }
                _ => tracing::error!(operation, %status, error = %err, "Stripe API error"),
            }
            return Err(err);
        }

        response.json::<T>().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }

    async fn fetch_invoice(&self, invoice_id: &str) -> Result<StripeInvoice, PaymentError> {
        self.send(
            self.request(reqwest::Method::GET, &format!("invoices/{}", invoice_id)),
            "get_invoice",
        )
        .await
    }
}

#[derive(Debug, Deserialize)]
struct IdBody {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeInvoice {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    paid: bool,
    #[serde(default)]
    amount_paid: i64,
    #[serde(default)]
    attempt_count: i32,
    #[serde(default)]
    next_payment_attempt: Option<i64>,
}

impl StripeInvoice {
    fn is_paid(&self) -> bool {
        self.paid || self.status.as_deref() == Some("paid")
    }

    fn into_payment(self, failure_message: Option<String>) -> InvoicePayment {
        let paid = self.is_paid();
        InvoicePayment {
            invoice_id: self.id,
            paid,
            amount_paid: self.amount_paid,
            attempt_count: self.attempt_count,
            next_payment_attempt: self.next_payment_attempt.and_then(Timestamp::from_unix_secs),
            failure_message: if paid { None } else { failure_message },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    decline_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn map_error_response(status: StatusCode, body: &str) -> PaymentError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .unwrap_or_default()
        .error;
    let message = detail
        .message
        .clone()
        .unwrap_or_else(|| format!("Stripe returned {}", status));

    let code = match (status, detail.kind.as_deref()) {
        (_, Some("card_error")) | (StatusCode::PAYMENT_REQUIRED, _) => {
            if detail.decline_code.as_deref() == Some("insufficient_funds") {
                PaymentErrorCode::InsufficientFunds
            } else {
                PaymentErrorCode::CardDeclined
            }
        }
        (StatusCode::NOT_FOUND, _) => PaymentErrorCode::NotFound,
        (StatusCode::TOO_MANY_REQUESTS, _) => PaymentErrorCode::RateLimitExceeded,
        (StatusCode::UNAUTHORIZED, _) | (StatusCode::FORBIDDEN, _) => {
            PaymentErrorCode::AuthenticationError
        }
        (s, _) if s.is_server_error() => PaymentErrorCode::ProviderError,
        (StatusCode::BAD_REQUEST, _) => PaymentErrorCode::InvalidRequest,
        _ => PaymentErrorCode::ProviderError,
    };

    let err = PaymentError::new(code, message);
    match detail.decline_code.or(detail.code) {
        Some(provider_code) => err.with_provider_code(provider_code),
        None => err,
    }
}

fn into_provider_subscription(object: SubscriptionObject) -> Result<ProviderSubscription, PaymentError> {
    let status = object.status().ok_or_else(|| {
        PaymentError::provider(format!("Unsupported subscription status: {}", object.status))
    })?;
    Ok(ProviderSubscription {
        period: object.period(),
        id: object.id,
        customer_id: object.customer,
        status,
        cancel_at_period_end: object.cancel_at_period_end,
    })
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_customer(&self, request: CreateCustomerRequest) -> Result<String, PaymentError> {
        let mut params = vec![
            ("email", request.email),
            ("metadata[profile_id]", request.profile_id.to_string()),
        ];
        if let Some(name) = request.name {
            params.push(("name", name));
        }

        let customer: IdBody = self
            .send(
                self.request(reqwest::Method::POST, "customers").form(&params),
                "create_customer",
            )
            .await?;

        tracing::info!(customer_id = %customer.id, profile_id = %request.profile_id, "Stripe customer created");
        Ok(customer.id)
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, PaymentError> {
        let object: SubscriptionObject = self
            .send(
                self.request(
                    reqwest::Method::GET,
                    &format!("subscriptions/{}", subscription_id),
                ),
                "get_subscription",
            )
            .await?;
        into_provider_subscription(object)
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<ProviderSubscription, PaymentError> {
        let path = format!("subscriptions/{}", subscription_id);
        let builder = if at_period_end {
            self.request(reqwest::Method::POST, &path)
                .form(&[("cancel_at_period_end", "true")])
        } else {
            self.request(reqwest::Method::DELETE, &path)
        };

        let object: SubscriptionObject = self.send(builder, "cancel_subscription").await?;
        into_provider_subscription(object)
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<HostedSession, PaymentError> {
        let profile_id = request.profile_id.to_string();
        let plan_id = request.plan_id.to_string();
        let params = vec![
            ("mode", "subscription".to_string()),
            ("customer", request.customer_id),
            ("line_items[0][price]", request.price_id),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", request.success_url),
            ("cancel_url", request.cancel_url),
            ("client_reference_id", profile_id.clone()),
            ("metadata[profile_id]", profile_id.clone()),
            ("metadata[plan_id]", plan_id.clone()),
            ("subscription_data[metadata][profile_id]", profile_id),
            ("subscription_data[metadata][plan_id]", plan_id),
        ];

        let session: SessionBody = self
            .send(
                self.request(reqwest::Method::POST, "checkout/sessions").form(&params),
                "create_checkout_session",
            )
            .await?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::provider("Checkout session has no URL"))?;
        Ok(HostedSession {
            id: session.id,
            url,
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<HostedSession, PaymentError> {
        let session: SessionBody = self
            .send(
                self.request(reqwest::Method::POST, "billing_portal/sessions")
                    .form(&[("customer", customer_id), ("return_url", return_url)]),
                "create_portal_session",
            )
            .await?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::provider("Portal session has no URL"))?;
        Ok(HostedSession {
            id: session.id,
            url,
        })
    }

    async fn pay_invoice(&self, invoice_id: &str) -> Result<InvoicePayment, PaymentError> {
        let current = self.fetch_invoice(invoice_id).await?;
        if current.is_paid() {
            return Ok(current.into_payment(None));
        }

        let attempt: Result<StripeInvoice, PaymentError> = self
            .send(
                self.request(
                    reqwest::Method::POST,
                    &format!("invoices/{}/pay", invoice_id),
                ),
                "pay_invoice",
            )
            .await;

        match attempt {
            Ok(invoice) => Ok(invoice.into_payment(None)),
            Err(err)
                if matches!(
                    err.code,
                    PaymentErrorCode::CardDeclined | PaymentErrorCode::InsufficientFunds
                ) =>
            {
                // The decline updated attempt_count and next_payment_attempt.
                let refreshed = self.fetch_invoice(invoice_id).await?;
                Ok(refreshed.into_payment(Some(err.message)))
            }
            Err(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for StripePaymentAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripePaymentAdapter")
            .field("api_base_url", &self.config.api_base_url)
            .finish_non_exhaustive()
    }
}
