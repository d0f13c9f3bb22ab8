//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured subscriptions and invoice outcomes
//! - Error injection, once or per method
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::billing::{BillingPeriod, SubscriptionStatus};
use crate::domain::foundation::Timestamp;
use crate::ports::{
    CreateCheckoutRequest, CreateCustomerRequest, HostedSession, InvoicePayment, PaymentError,
    PaymentProvider, ProviderSubscription,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Configure responses
/// mock.add_subscription(MockPaymentProvider::active_subscription("sub_1", "cus_1"));
///
/// // Inject errors
/// mock.fail_method("pay_invoice", PaymentError::network("timeout"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Subscriptions by provider id.
    subscriptions: HashMap<String, ProviderSubscription>,

    /// Result of `pay_invoice` by invoice id.
    invoice_outcomes: HashMap<String, InvoicePayment>,

    customers_created: u32,

    /// Error to return on the next call, whatever the method.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// An active monthly subscription starting now.
    pub fn active_subscription(id: &str, customer_id: &str) -> ProviderSubscription {
        let start = Timestamp::now();
        ProviderSubscription {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            status: SubscriptionStatus::Active,
            period: BillingPeriod::new(start, start.add_days(30)).ok(),
            cancel_at_period_end: false,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a subscription to the "database".
    pub fn add_subscription(&self, subscription: ProviderSubscription) {
        self.state()
            .subscriptions
            .insert(subscription.id.clone(), subscription);
    }

    /// Configure what `pay_invoice` reports for an invoice.
    pub fn set_invoice_outcome(&self, payment: InvoicePayment) {
        self.state()
            .invoice_outcomes
            .insert(payment.invoice_id.clone(), payment);
    }

    /// Fail the next call, whichever method it is.
    pub fn set_next_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Fail every call to `method` until cleared.
    pub fn fail_method(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<MethodCall> {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    fn record(&self, method: &str, args: Vec<String>) -> Result<(), PaymentError> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        match state.method_errors.get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(&self, request: CreateCustomerRequest) -> Result<String, PaymentError> {
        self.record(
            "create_customer",
            vec![request.profile_id.to_string(), request.email.clone()],
        )?;
        let mut state = self.state();
        state.customers_created += 1;
        Ok(format!("cus_mock_{}", state.customers_created))
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, PaymentError> {
        self.record("get_subscription", vec![subscription_id.to_string()])?;
        self.state()
            .subscriptions
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("subscription"))
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<ProviderSubscription, PaymentError> {
        self.record(
            "cancel_subscription",
            vec![subscription_id.to_string(), at_period_end.to_string()],
        )?;
        let mut state = self.state();
        let subscription = state
            .subscriptions
            .get_mut(subscription_id)
            .ok_or_else(|| PaymentError::not_found("subscription"))?;
        if at_period_end {
            subscription.cancel_at_period_end = true;
        } else {
            subscription.status = SubscriptionStatus::Canceled;
        }
        Ok(subscription.clone())
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<HostedSession, PaymentError> {
        self.record(
            "create_checkout_session",
            vec![
                request.customer_id.clone(),
                request.price_id.clone(),
                request.profile_id.to_string(),
                request.plan_id.to_string(),
            ],
        )?;
        Ok(HostedSession {
            id: "cs_mock".to_string(),
            url: format!("https://checkout.stripe.test/pay/{}", request.price_id),
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<HostedSession, PaymentError> {
        self.record(
            "create_portal_session",
            vec![customer_id.to_string(), return_url.to_string()],
        )?;
        Ok(HostedSession {
            id: "bps_mock".to_string(),
            url: format!("https://billing.stripe.test/session/{}", customer_id),
        })
    }

    async fn pay_invoice(&self, invoice_id: &str) -> Result<InvoicePayment, PaymentError> {
        self.record("pay_invoice", vec![invoice_id.to_string()])?;
        self.state()
            .invoice_outcomes
            .get(invoice_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("invoice"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PlanId, ProfileId};
    use crate::ports::PaymentErrorCode;

    #[tokio::test]
    async fn create_customer_returns_sequential_ids() {
        let mock = MockPaymentProvider::new();
        let request = CreateCustomerRequest {
            profile_id: ProfileId::new(),
            email: "a@example.com".to_string(),
            name: None,
        };

        assert_eq!(mock.create_customer(request.clone()).await.unwrap(), "cus_mock_1");
        assert_eq!(mock.create_customer(request).await.unwrap(), "cus_mock_2");
        assert_eq!(mock.calls_to("create_customer").len(), 2);
    }

    #[tokio::test]
    async fn cancel_at_period_end_keeps_status() {
        let mock = MockPaymentProvider::new();
        mock.add_subscription(MockPaymentProvider::active_subscription("sub_1", "cus_1"));

        let sub = mock.cancel_subscription("sub_1", true).await.unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert!(sub.cancel_at_period_end);
    }

    #[tokio::test]
    async fn next_error_applies_once() {
        let mock = MockPaymentProvider::new();
        mock.set_next_error(PaymentError::network("timeout"));

        let first = mock
            .create_checkout_session(CreateCheckoutRequest {
                customer_id: "cus_1".to_string(),
                price_id: "price_1".to_string(),
                profile_id: ProfileId::new(),
                plan_id: PlanId::new(),
                success_url: "https://site/ok".to_string(),
                cancel_url: "https://site/cancel".to_string(),
            })
            .await;
        let second = mock.create_portal_session("cus_1", "https://site").await;

        assert_eq!(first.unwrap_err().code, PaymentErrorCode::NetworkError);
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn method_errors_persist_until_cleared() {
        let mock = MockPaymentProvider::new();
        mock.fail_method("pay_invoice", PaymentError::network("down"));

        assert!(mock.pay_invoice("in_1").await.is_err());
        assert!(mock.pay_invoice("in_1").await.is_err());

        mock.clear_errors();
        let err = mock.pay_invoice("in_1").await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::NotFound);
    }
}
