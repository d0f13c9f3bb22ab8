//! Stripe webhook event handlers.
//!
//! One handler per event family, routed by `StripeWebhookDispatcher`. Handlers
//! return `WebhookError`, whose HTTP status decides whether Stripe redelivers:
//! out-of-order transitions are acknowledged as ignored, while an unknown
//! subscription answers 5xx so the checkout event can land first.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::billing::{
    CheckoutSessionObject, InvoiceObject, InvoiceRef, PaymentRecord, PaymentStatus, StripeEvent,
    StripeEventType, Subscription, SubscriptionObject, SubscriptionStatus, WebhookDispatcher,
    WebhookError, WebhookEventHandler,
};
use crate::domain::foundation::{PlanId, ProfileId};
use crate::ports::{
    PaymentHistoryRepository, PaymentProvider, PlanRepository, ProfileRepository,
    SubscriptionRepository,
};

const DEFAULT_FAILURE_MESSAGE: &str = "Payment failed";

fn parse_object<T: serde::de::DeserializeOwned>(event: &StripeEvent) -> Result<T, WebhookError> {
    event
        .deserialize_object()
        .map_err(|e| WebhookError::ParseError(format!("{} object: {}", event.event_type, e)))
}

async fn load_subscription(
    subscriptions: &dyn SubscriptionRepository,
    stripe_subscription_id: &str,
) -> Result<Subscription, WebhookError> {
    subscriptions
        .find_by_stripe_subscription_id(stripe_subscription_id)
        .await?
        .ok_or_else(|| WebhookError::SubscriptionNotFound(stripe_subscription_id.to_string()))
}

fn invoice_ref(subscription: &Subscription, invoice: &InvoiceObject, amount_cents: i64) -> InvoiceRef {
    InvoiceRef {
        profile_id: subscription.profile_id,
        subscription_id: Some(subscription.id),
        stripe_invoice_id: invoice.id.clone(),
        amount_cents,
        currency: invoice.currency.clone(),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// checkout.session.completed
// ════════════════════════════════════════════════════════════════════════════════

/// Links a completed checkout to a local subscription row.
pub struct CheckoutCompletedHandler {
    profiles: Arc<dyn ProfileRepository>,
    plans: Arc<dyn PlanRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl CheckoutCompletedHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        plans: Arc<dyn PlanRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            profiles,
            plans,
            subscriptions,
            provider,
        }
    }
}

#[async_trait]
impl WebhookEventHandler for CheckoutCompletedHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::CheckoutSessionCompleted]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let session: CheckoutSessionObject = parse_object(event)?;
        if session.mode.as_deref() != Some("subscription") {
            return Err(WebhookError::Ignored(format!(
                "checkout mode {}",
                session.mode.as_deref().unwrap_or("unknown")
            )));
        }

        let profile_id: ProfileId = session
            .metadata
            .get("profile_id")
            .or(session.client_reference_id.as_ref())
            .ok_or(WebhookError::MissingMetadata("profile_id"))?
            .parse()
            .map_err(|_| WebhookError::ParseError("profile_id is not a UUID".to_string()))?;
        let plan_id: PlanId = session
            .metadata
            .get("plan_id")
            .ok_or(WebhookError::MissingMetadata("plan_id"))?
            .parse()
            .map_err(|_| WebhookError::ParseError("plan_id is not a UUID".to_string()))?;
        let stripe_subscription_id = session
            .subscription
            .as_deref()
            .ok_or(WebhookError::MissingField("subscription"))?;

        if self.plans.find_by_id(&plan_id).await?.is_none() {
            return Err(WebhookError::ParseError(format!("unknown plan {}", plan_id)));
        }
        let mut profile = self
            .profiles
            .find_by_id(&profile_id)
            .await?
            .ok_or_else(|| WebhookError::ParseError(format!("unknown profile {}", profile_id)))?;

        let remote = self
            .provider
            .get_subscription(stripe_subscription_id)
            .await
            .map_err(|e| WebhookError::Provider(e.to_string()))?;

        let subscription = match self
            .subscriptions
            .find_by_stripe_subscription_id(stripe_subscription_id)
            .await?
        {
            Some(mut existing) => {
                existing.sync_from_provider(remote.status, remote.period, remote.cancel_at_period_end)?;
                existing
            }
            None => Subscription::start(
                profile_id,
                plan_id,
                remote.customer_id.clone(),
                remote.id.clone(),
                remote.status,
                remote.period,
                remote.cancel_at_period_end,
            ),
        };
        self.subscriptions.save(&subscription).await?;

        if profile.stripe_customer_id.is_none() {
            profile.stripe_customer_id = Some(remote.customer_id);
            self.profiles.update(&profile).await?;
        }

        tracing::info!(
            profile_id = %profile_id,
            stripe_subscription_id = %stripe_subscription_id,
            status = %subscription.status,
            "Checkout completed"
        );
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// invoice.paid / invoice.payment_succeeded
// ════════════════════════════════════════════════════════════════════════════════

pub struct InvoicePaidHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    payments: Arc<dyn PaymentHistoryRepository>,
}

impl InvoicePaidHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        payments: Arc<dyn PaymentHistoryRepository>,
    ) -> Self {
        Self {
            subscriptions,
            payments,
        }
    }
}

#[async_trait]
impl WebhookEventHandler for InvoicePaidHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::InvoicePaid]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let invoice: InvoiceObject = parse_object(event)?;
        let Some(stripe_subscription_id) = invoice.subscription.as_deref() else {
            return Err(WebhookError::Ignored("invoice has no subscription".to_string()));
        };
        let mut subscription =
            load_subscription(self.subscriptions.as_ref(), stripe_subscription_id).await?;

        let payment = match self.payments.find_by_invoice_id(&invoice.id).await? {
            Some(mut existing) => {
                if existing.status != PaymentStatus::Succeeded {
                    existing.mark_succeeded(invoice.amount_paid)?;
                }
                existing
            }
            None => PaymentRecord::succeeded(
                invoice_ref(&subscription, &invoice, invoice.amount_paid),
                invoice.attempt_count,
            ),
        };
        self.payments.save(&payment).await?;

        let period = invoice.service_period();
        if period.is_some_and(|p| subscription.is_stale_period(&p)) {
            tracing::info!(
                invoice_id = %invoice.id,
                stripe_subscription_id = %stripe_subscription_id,
                "Invoice paid for an earlier period, subscription left as is"
            );
            return Ok(());
        }
        subscription.recover(period)?;
        self.subscriptions.save(&subscription).await?;

        tracing::info!(
            invoice_id = %invoice.id,
            stripe_subscription_id = %stripe_subscription_id,
            amount_cents = invoice.amount_paid,
            status = %subscription.status,
            "Invoice paid"
        );
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// invoice.payment_failed
// ════════════════════════════════════════════════════════════════════════════════

pub struct InvoicePaymentFailedHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    payments: Arc<dyn PaymentHistoryRepository>,
}

impl InvoicePaymentFailedHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        payments: Arc<dyn PaymentHistoryRepository>,
    ) -> Self {
        Self {
            subscriptions,
            payments,
        }
    }
}

#[async_trait]
impl WebhookEventHandler for InvoicePaymentFailedHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::InvoicePaymentFailed]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let invoice: InvoiceObject = parse_object(event)?;
        let Some(stripe_subscription_id) = invoice.subscription.as_deref() else {
            return Err(WebhookError::Ignored("invoice has no subscription".to_string()));
        };
        let mut subscription =
            load_subscription(self.subscriptions.as_ref(), stripe_subscription_id).await?;

        let message = invoice
            .failure_message()
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        let payment = match self.payments.find_by_invoice_id(&invoice.id).await? {
            Some(mut existing) => {
                existing.record_failed_attempt(
                    invoice.attempt_count,
                    invoice.next_attempt_at(),
                    Some(message),
                )?;
                existing
            }
            None => PaymentRecord::failed(
                invoice_ref(&subscription, &invoice, invoice.amount_due),
                invoice.attempt_count,
                invoice.next_attempt_at(),
                Some(message),
            ),
        };
        self.payments.save(&payment).await?;

        if subscription.has_access() {
            subscription.mark_past_due()?;
            self.subscriptions.save(&subscription).await?;
        }

        tracing::warn!(
            invoice_id = %invoice.id,
            stripe_subscription_id = %stripe_subscription_id,
            attempt_count = payment.attempt_count,
            "Invoice payment failed"
        );
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// customer.subscription.updated / deleted
// ════════════════════════════════════════════════════════════════════════════════

pub struct SubscriptionUpdatedHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionUpdatedHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }
}

#[async_trait]
impl WebhookEventHandler for SubscriptionUpdatedHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::CustomerSubscriptionUpdated]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let remote: SubscriptionObject = parse_object(event)?;
        let Some(status) = remote.status() else {
            return Err(WebhookError::Ignored(format!(
                "unhandled subscription status {}",
                remote.status
            )));
        };

        let mut subscription = load_subscription(self.subscriptions.as_ref(), &remote.id).await?;
        subscription.sync_from_provider(status, remote.period(), remote.cancel_at_period_end)?;
        self.subscriptions.save(&subscription).await?;

        tracing::info!(stripe_subscription_id = %remote.id, status = %status, "Subscription updated");
        Ok(())
    }
}

pub struct SubscriptionDeletedHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionDeletedHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }
}

#[async_trait]
impl WebhookEventHandler for SubscriptionDeletedHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::CustomerSubscriptionDeleted]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let remote: SubscriptionObject = parse_object(event)?;
        let Some(mut subscription) = self
            .subscriptions
            .find_by_stripe_subscription_id(&remote.id)
            .await?
        else {
            return Err(WebhookError::Ignored(format!(
                "subscription {} was never stored",
                remote.id
            )));
        };

        if subscription.status == SubscriptionStatus::Canceled {
            return Ok(());
        }
        subscription.cancel()?;
        self.subscriptions.save(&subscription).await?;

        tracing::info!(stripe_subscription_id = %remote.id, "Subscription canceled");
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Dispatcher
// ════════════════════════════════════════════════════════════════════════════════

/// Routes events to the first registered handler that claims their type.
#[derive(Default)]
pub struct StripeWebhookDispatcher {
    handlers: Vec<Box<dyn WebhookEventHandler>>,
}

impl StripeWebhookDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, handler: impl WebhookEventHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// All billing handlers wired to the given ports.
    pub fn billing(
        profiles: Arc<dyn ProfileRepository>,
        plans: Arc<dyn PlanRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        payments: Arc<dyn PaymentHistoryRepository>,
        provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self::new()
            .with_handler(CheckoutCompletedHandler::new(
                profiles,
                plans,
                subscriptions.clone(),
                provider,
            ))
            .with_handler(InvoicePaidHandler::new(subscriptions.clone(), payments.clone()))
            .with_handler(InvoicePaymentFailedHandler::new(subscriptions.clone(), payments))
            .with_handler(SubscriptionUpdatedHandler::new(subscriptions.clone()))
            .with_handler(SubscriptionDeletedHandler::new(subscriptions))
    }
}

impl WebhookDispatcher for StripeWebhookDispatcher {
    fn get_handler(&self, event_type: &StripeEventType) -> Option<&dyn WebhookEventHandler> {
        self.handlers
            .iter()
            .find(|h| h.handles().contains(event_type))
            .map(|h| h.as_ref())
    }
}
