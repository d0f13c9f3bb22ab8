//! Member-facing subscription reads and cancellation.

use std::sync::Arc;

use crate::domain::billing::{PaymentRecord, Subscription};
use crate::domain::dashboard::SubscriptionSummary;
use crate::domain::foundation::{DomainError, ProfileId};
use crate::ports::{
    PaymentHistoryRepository, PaymentProvider, PlanRepository, SubscriptionRepository,
};

pub const MAX_PAYMENTS_PAGE: i64 = 100;

/// The caller's latest subscription with its plan name.
pub struct GetMySubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
}

impl GetMySubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>, plans: Arc<dyn PlanRepository>) -> Self {
        Self {
            subscriptions,
            plans,
        }
    }

    pub async fn handle(&self, profile_id: ProfileId) -> Result<Option<SubscriptionSummary>, DomainError> {
        let Some(subscription) = self.subscriptions.find_latest_for_profile(&profile_id).await? else {
            return Ok(None);
        };
        let plan_name = self
            .plans
            .find_by_id(&subscription.plan_id)
            .await?
            .map(|p| p.name)
            .unwrap_or_default();
        Ok(Some(SubscriptionSummary::new(subscription, plan_name)))
    }
}

pub struct ListMyPaymentsHandler {
    payments: Arc<dyn PaymentHistoryRepository>,
}

impl ListMyPaymentsHandler {
    pub fn new(payments: Arc<dyn PaymentHistoryRepository>) -> Self {
        Self { payments }
    }

    /// Newest first; `limit` is clamped to `1..=MAX_PAYMENTS_PAGE`.
    pub async fn handle(&self, profile_id: ProfileId, limit: i64) -> Result<Vec<PaymentRecord>, DomainError> {
        self.payments
            .list_for_profile(&profile_id, limit.clamp(1, MAX_PAYMENTS_PAGE))
            .await
    }
}

/// Stops renewal at the end of the current period.
///
/// The provider is told first; the local flag is set from its answer and the
/// later `customer.subscription.updated` event confirms it.
pub struct CancelSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl CancelSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>, provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            subscriptions,
            provider,
        }
    }

    pub async fn handle(&self, profile_id: ProfileId) -> Result<Subscription, DomainError> {
        let mut subscription = self
            .subscriptions
            .find_latest_for_profile(&profile_id)
            .await?
            .ok_or_else(|| DomainError::not_found("subscription", profile_id))?;

        // Fails with InvalidStateTransition before any provider call.
        subscription.request_cancellation_at_period_end()?;

        let remote = self
            .provider
            .cancel_subscription(&subscription.stripe_subscription_id, true)
            .await?;
        subscription.cancel_at_period_end = remote.cancel_at_period_end;
        self.subscriptions.save(&subscription).await?;

        tracing::info!(
            profile_id = %profile_id,
            stripe_subscription_id = %subscription.stripe_subscription_id,
            "Cancellation at period end requested"
        );
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPaymentHistoryRepository, InMemoryPlanRepository, InMemorySubscriptionRepository,
    };
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::billing::{InvoiceRef, SubscriptionStatus};
    use crate::domain::foundation::{ErrorCode, PlanId};

    fn subscription(profile_id: ProfileId, status: SubscriptionStatus) -> Subscription {
        Subscription::start(profile_id, PlanId::new(), "cus_1", "sub_1", status, None, false)
    }

    #[tokio::test]
    async fn no_subscription_reads_as_none() {
        let handler = GetMySubscriptionHandler::new(
            Arc::new(InMemorySubscriptionRepository::new()),
            Arc::new(InMemoryPlanRepository::new()),
        );

        assert!(handler.handle(ProfileId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn summary_reports_access() {
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let profile_id = ProfileId::new();
        subscriptions
            .save(&subscription(profile_id, SubscriptionStatus::PastDue))
            .await
            .unwrap();
        let handler = GetMySubscriptionHandler::new(subscriptions, Arc::new(InMemoryPlanRepository::new()));

        let summary = handler.handle(profile_id).await.unwrap().unwrap();

        assert!(summary.has_access);
        assert_eq!(summary.plan_name, "");
    }

    #[tokio::test]
    async fn payments_limit_is_clamped() {
        let payments = Arc::new(InMemoryPaymentHistoryRepository::new());
        let profile_id = ProfileId::new();
        for n in 0..3 {
            payments
                .save(&PaymentRecord::succeeded(
                    InvoiceRef {
                        profile_id,
                        subscription_id: None,
                        stripe_invoice_id: format!("in_{}", n),
                        amount_cents: 8900,
                        currency: "eur".to_string(),
                    },
                    1,
                ))
                .await
                .unwrap();
        }
        let handler = ListMyPaymentsHandler::new(payments);

        assert_eq!(handler.handle(profile_id, 0).await.unwrap().len(), 1);
        assert_eq!(handler.handle(profile_id, 500).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn cancel_sets_flag_through_provider() {
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());
        provider.add_subscription(MockPaymentProvider::active_subscription("sub_1", "cus_1"));
        let profile_id = ProfileId::new();
        subscriptions
            .save(&subscription(profile_id, SubscriptionStatus::Active))
            .await
            .unwrap();

        let sub = CancelSubscriptionHandler::new(subscriptions.clone(), provider.clone())
            .handle(profile_id)
            .await
            .unwrap();

        assert!(sub.cancel_at_period_end);
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(provider.calls_to("cancel_subscription")[0].args, vec!["sub_1", "true"]);
        let stored = subscriptions.find_by_stripe_subscription_id("sub_1").await.unwrap().unwrap();
        assert!(stored.cancel_at_period_end);
    }

    #[tokio::test]
    async fn cancel_without_access_is_invalid() {
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());
        let profile_id = ProfileId::new();
        subscriptions
            .save(&subscription(profile_id, SubscriptionStatus::Canceled))
            .await
            .unwrap();

        let err = CancelSubscriptionHandler::new(subscriptions, provider.clone())
            .handle(profile_id)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert!(!provider.was_called("cancel_subscription"));
    }

    #[tokio::test]
    async fn cancel_without_subscription_is_not_found() {
        let err = CancelSubscriptionHandler::new(
            Arc::new(InMemorySubscriptionRepository::new()),
            Arc::new(MockPaymentProvider::new()),
        )
        .handle(ProfileId::new())
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
