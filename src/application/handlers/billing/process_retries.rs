//! Scheduled retry pass over failed payments.
//!
//! Triggered by the cron endpoint. Each due payment is either abandoned (its
//! attempts are exhausted, or the provider stopped scheduling retries) or
//! collected again through the provider. Old webhook records are purged on
//! the same run.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::config::CronConfig;
use crate::domain::billing::{PaymentRecord, Subscription};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{
    PaymentHistoryRepository, PaymentProvider, SubscriptionRepository, WebhookEventRepository,
};

const EXHAUSTED_REASON: &str = "Retry attempts exhausted";
const NO_RETRY_REASON: &str = "Provider scheduled no further attempts";

/// Limits for one retry pass.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: i32,
    pub batch_size: i64,
    pub webhook_retention_days: i64,
}

impl From<&CronConfig> for RetryPolicy {
    fn from(config: &CronConfig) -> Self {
        Self {
            max_attempts: config.max_payment_attempts,
            batch_size: config.retry_batch_size,
            webhook_retention_days: config.webhook_retention_days,
        }
    }
}

/// Counts reported back to the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetryReport {
    pub examined: usize,
    pub recovered: usize,
    pub still_failing: usize,
    pub abandoned: usize,
    pub purged_webhook_events: u64,
}

enum Outcome {
    Recovered,
    StillFailing,
    Abandoned,
}

pub struct ProcessRetriesHandler {
    payments: Arc<dyn PaymentHistoryRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    provider: Arc<dyn PaymentProvider>,
    webhook_events: Arc<dyn WebhookEventRepository>,
    policy: RetryPolicy,
}

impl ProcessRetriesHandler {
    pub fn new(
        payments: Arc<dyn PaymentHistoryRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        provider: Arc<dyn PaymentProvider>,
        webhook_events: Arc<dyn WebhookEventRepository>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            payments,
            subscriptions,
            provider,
            webhook_events,
            policy,
        }
    }

    /// A failure on one payment is logged and counted as still failing; only
    /// the initial listing and the purge abort the run.
    pub async fn handle(&self) -> Result<RetryReport, DomainError> {
        let due = self
            .payments
            .list_due_for_retry(Timestamp::now(), self.policy.batch_size)
            .await?;

        let mut report = RetryReport {
            examined: due.len(),
            ..RetryReport::default()
        };

        for payment in due {
            let invoice_id = payment.stripe_invoice_id.clone();
            match self.retry(payment).await {
                Ok(Outcome::Recovered) => report.recovered += 1,
                Ok(Outcome::Abandoned) => report.abandoned += 1,
                Ok(Outcome::StillFailing) => report.still_failing += 1,
                Err(e) => {
                    tracing::warn!(invoice_id = %invoice_id, error = %e, "Payment retry left as failing");
                    report.still_failing += 1;
                }
            }
        }

        let cutoff = Utc::now() - Duration::days(self.policy.webhook_retention_days);
        report.purged_webhook_events = self.webhook_events.delete_before(cutoff).await?;

        tracing::info!(
            examined = report.examined,
            recovered = report.recovered,
            still_failing = report.still_failing,
            abandoned = report.abandoned,
            purged = report.purged_webhook_events,
            "Retry pass finished"
        );
        Ok(report)
    }

    async fn retry(&self, mut payment: PaymentRecord) -> Result<Outcome, DomainError> {
        if payment.attempts_exhausted(self.policy.max_attempts) {
            return self.give_up(payment, EXHAUSTED_REASON).await;
        }

        let result = match self.provider.pay_invoice(&payment.stripe_invoice_id).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    invoice_id = %payment.stripe_invoice_id,
                    code = %e.code,
                    retryable = e.retryable,
                    "Provider rejected invoice payment"
                );
                return Err(e.into());
            }
        };
        if result.paid {
            payment.mark_succeeded(result.amount_paid)?;
            self.payments.save(&payment).await?;
            self.update_subscription(&payment, |s| s.recover(None)).await?;
            return Ok(Outcome::Recovered);
        }

        match result.next_payment_attempt {
            Some(next) => {
                payment.record_failed_attempt(result.attempt_count, Some(next), result.failure_message)?;
                self.payments.save(&payment).await?;
                Ok(Outcome::StillFailing)
            }
            None => self.give_up(payment, NO_RETRY_REASON).await,
        }
    }

    async fn give_up(&self, mut payment: PaymentRecord, reason: &str) -> Result<Outcome, DomainError> {
        payment.abandon(reason)?;
        self.payments.save(&payment).await?;
        self.update_subscription(&payment, |s| s.mark_unpaid()).await?;
        tracing::warn!(invoice_id = %payment.stripe_invoice_id, reason, "Payment abandoned");
        Ok(Outcome::Abandoned)
    }

    /// Applies `change` to the payment's subscription when it is still the
    /// member's current one.
    async fn update_subscription<F>(&self, payment: &PaymentRecord, change: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Subscription) -> Result<(), DomainError>,
    {
        let Some(subscription_id) = payment.subscription_id else {
            return Ok(());
        };
        let Some(mut subscription) = self
            .subscriptions
            .find_latest_for_profile(&payment.profile_id)
            .await?
            .filter(|s| s.id == subscription_id)
        else {
            return Ok(());
        };

        match change(&mut subscription) {
            Ok(()) => self.subscriptions.save(&subscription).await,
            Err(e) => {
                tracing::debug!(subscription_id = %subscription.id, error = %e, "Subscription left unchanged");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPaymentHistoryRepository, InMemorySubscriptionRepository,
        InMemoryWebhookEventRepository,
    };
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::billing::{InvoiceRef, PaymentStatus, SubscriptionStatus};
    use crate::domain::foundation::{PlanId, ProfileId};
    use crate::ports::{InvoicePayment, PaymentError, WebhookEventRecord};

    struct Fixture {
        payments: Arc<InMemoryPaymentHistoryRepository>,
        subscriptions: Arc<InMemorySubscriptionRepository>,
        provider: Arc<MockPaymentProvider>,
        events: Arc<InMemoryWebhookEventRepository>,
        subscription: Subscription,
    }

    impl Fixture {
        async fn new() -> Self {
            let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
            let subscription = Subscription::start(
                ProfileId::new(),
                PlanId::new(),
                "cus_1",
                "sub_1",
                SubscriptionStatus::PastDue,
                None,
                false,
            );
            subscriptions.save(&subscription).await.unwrap();
            Self {
                payments: Arc::new(InMemoryPaymentHistoryRepository::new()),
                subscriptions,
                provider: Arc::new(MockPaymentProvider::new()),
                events: Arc::new(InMemoryWebhookEventRepository::new()),
                subscription,
            }
        }

        async fn due_payment(&self, invoice_id: &str, attempt_count: i32) {
            let payment = PaymentRecord::failed(
                InvoiceRef {
                    profile_id: self.subscription.profile_id,
                    subscription_id: Some(self.subscription.id),
                    stripe_invoice_id: invoice_id.to_string(),
                    amount_cents: 8900,
                    currency: "eur".to_string(),
                },
                attempt_count,
                Some(Timestamp::now().add_secs(-60)),
                Some("card_declined".to_string()),
            );
            self.payments.save(&payment).await.unwrap();
        }

        fn handler(&self) -> ProcessRetriesHandler {
            ProcessRetriesHandler::new(
                self.payments.clone(),
                self.subscriptions.clone(),
                self.provider.clone(),
                self.events.clone(),
                RetryPolicy::from(&CronConfig::default()),
            )
        }

        async fn payment(&self, invoice_id: &str) -> PaymentRecord {
            self.payments.find_by_invoice_id(invoice_id).await.unwrap().unwrap()
        }

        async fn status(&self) -> SubscriptionStatus {
            self.subscriptions
                .find_by_stripe_subscription_id("sub_1")
                .await
                .unwrap()
                .unwrap()
                .status
        }
    }

    fn outcome(invoice_id: &str, paid: bool, next: Option<Timestamp>) -> InvoicePayment {
        InvoicePayment {
            invoice_id: invoice_id.to_string(),
            paid,
            amount_paid: if paid { 8900 } else { 0 },
            attempt_count: 2,
            next_payment_attempt: next,
            failure_message: (!paid).then(|| "Your card was declined.".to_string()),
        }
    }

    #[tokio::test]
    async fn paid_retry_recovers_subscription() {
        let fx = Fixture::new().await;
        fx.due_payment("in_1", 1).await;
        fx.provider.set_invoice_outcome(outcome("in_1", true, None));

        let report = fx.handler().handle().await.unwrap();

        assert_eq!(report.examined, 1);
        assert_eq!(report.recovered, 1);
        assert_eq!(fx.payment("in_1").await.status, PaymentStatus::Succeeded);
        assert_eq!(fx.status().await, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn provider_outage_leaves_payment_failing() {
        let fx = Fixture::new().await;
        fx.due_payment("in_1", 1).await;
        fx.provider
            .fail_method("pay_invoice", PaymentError::network("connection reset"));

        let report = fx.handler().handle().await.unwrap();

        assert_eq!(report.still_failing, 1);
        assert_eq!(report.recovered, 0);
        let payment = fx.payment("in_1").await;
        assert_eq!(payment.status, PaymentStatus::Failed);
        assert_eq!(payment.attempt_count, 1);
        assert_eq!(fx.status().await, SubscriptionStatus::PastDue);
    }

    #[tokio::test]
    async fn declined_retry_is_rescheduled() {
        let fx = Fixture::new().await;
        fx.due_payment("in_1", 1).await;
        let next = Timestamp::now().add_days(2);
        fx.provider.set_invoice_outcome(outcome("in_1", false, Some(next)));

        let report = fx.handler().handle().await.unwrap();

        assert_eq!(report.still_failing, 1);
        let payment = fx.payment("in_1").await;
        assert_eq!(payment.attempt_count, 2);
        assert_eq!(payment.next_retry_at, Some(next));
        assert_eq!(payment.failure_message.as_deref(), Some("Your card was declined."));
        assert_eq!(fx.status().await, SubscriptionStatus::PastDue);
    }

    #[tokio::test]
    async fn exhausted_attempts_abandon_without_charging() {
        let fx = Fixture::new().await;
        fx.due_payment("in_1", 4).await;

        let report = fx.handler().handle().await.unwrap();

        assert_eq!(report.abandoned, 1);
        assert!(!fx.provider.was_called("pay_invoice"));
        assert_eq!(fx.payment("in_1").await.status, PaymentStatus::Abandoned);
        assert_eq!(fx.status().await, SubscriptionStatus::Unpaid);
    }

    #[tokio::test]
    async fn no_further_attempt_abandons() {
        let fx = Fixture::new().await;
        fx.due_payment("in_1", 1).await;
        fx.provider.set_invoice_outcome(outcome("in_1", false, None));

        let report = fx.handler().handle().await.unwrap();

        assert_eq!(report.abandoned, 1);
        assert_eq!(fx.status().await, SubscriptionStatus::Unpaid);
    }

    #[tokio::test]
    async fn provider_error_on_one_payment_does_not_stop_the_run() {
        let fx = Fixture::new().await;
        fx.due_payment("in_1", 1).await;
        fx.due_payment("in_2", 1).await;
        // in_1 has no configured outcome, so the provider answers not found.
        fx.provider.set_invoice_outcome(outcome("in_2", true, None));

        let report = fx.handler().handle().await.unwrap();

        assert_eq!(report.examined, 2);
        assert_eq!(report.still_failing, 1);
        assert_eq!(report.recovered, 1);
    }

    #[tokio::test]
    async fn old_webhook_events_are_purged() {
        let fx = Fixture::new().await;
        let mut old = WebhookEventRecord::success("evt_old", "invoice.paid", serde_json::json!({}));
        old.processed_at = Utc::now() - Duration::days(40);
        fx.events.save(old).await.unwrap();
        fx.events
            .save(WebhookEventRecord::success("evt_new", "invoice.paid", serde_json::json!({})))
            .await
            .unwrap();

        let report = fx.handler().handle().await.unwrap();

        assert_eq!(report.examined, 0);
        assert_eq!(report.purged_webhook_events, 1);
        assert_eq!(fx.events.len().await, 1);
    }
}
