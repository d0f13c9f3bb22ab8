//! In-memory billing repositories: plans, subscriptions and payment history.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::billing::{MembershipPlan, PaymentRecord, PaymentStatus, Subscription};
use crate::domain::foundation::{DomainError, PlanId, ProfileId, SubscriptionId, Timestamp};
use crate::ports::{PaymentHistoryRepository, PlanRepository, SubscriptionRepository};

#[derive(Debug, Default)]
pub struct InMemoryPlanRepository {
    plans: RwLock<HashMap<PlanId, MembershipPlan>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_price_unique(
    plans: &HashMap<PlanId, MembershipPlan>,
    plan: &MembershipPlan,
) -> Result<(), DomainError> {
    if plans
        .values()
        .any(|p| p.id != plan.id && p.stripe_price_id == plan.stripe_price_id)
    {
        return Err(DomainError::conflict(format!(
            "Stripe price {} is already used by another plan",
            plan.stripe_price_id
        )));
    }
    Ok(())
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn create(&self, plan: &MembershipPlan) -> Result<(), DomainError> {
        let mut plans = self.plans.write().await;
        check_price_unique(&plans, plan)?;
        plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn update(&self, plan: &MembershipPlan) -> Result<(), DomainError> {
        let mut plans = self.plans.write().await;
        if !plans.contains_key(&plan.id) {
            return Err(DomainError::not_found("MembershipPlan", plan.id));
        }
        check_price_unique(&plans, plan)?;
        plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<MembershipPlan>, DomainError> {
        Ok(self.plans.read().await.get(id).cloned())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<MembershipPlan>, DomainError> {
        let mut plans: Vec<_> = self
            .plans
            .read()
            .await
            .values()
            .filter(|p| include_inactive || p.is_active)
            .cloned()
            .collect();
        plans.sort_by_key(|p| p.price_cents);
        Ok(plans)
    }
}

#[derive(Debug, Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn all(&self) -> Vec<Subscription> {
        self.subscriptions.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut subscriptions = self.subscriptions.write().await;
        if subscriptions.values().any(|s| {
            s.id != subscription.id
                && s.stripe_subscription_id == subscription.stripe_subscription_id
        }) {
            return Err(DomainError::conflict("Stripe subscription is already linked"));
        }
        subscriptions.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn find_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .read()
            .await
            .values()
            .find(|s| s.stripe_subscription_id == stripe_subscription_id)
            .cloned())
    }

    async fn find_latest_for_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|s| &s.profile_id == profile_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPaymentHistoryRepository {
    payments: RwLock<HashMap<String, PaymentRecord>>,
}

impl InMemoryPaymentHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentHistoryRepository for InMemoryPaymentHistoryRepository {
    async fn save(&self, payment: &PaymentRecord) -> Result<(), DomainError> {
        self.payments
            .write()
            .await
            .insert(payment.stripe_invoice_id.clone(), payment.clone());
        Ok(())
    }

    async fn find_by_invoice_id(
        &self,
        stripe_invoice_id: &str,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        Ok(self.payments.read().await.get(stripe_invoice_id).cloned())
    }

    async fn list_for_profile(
        &self,
        profile_id: &ProfileId,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, DomainError> {
        let mut rows: Vec<_> = self
            .payments
            .read()
            .await
            .values()
            .filter(|p| &p.profile_id == profile_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn list_due_for_retry(
        &self,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, DomainError> {
        let mut rows: Vec<_> = self
            .payments
            .read()
            .await
            .values()
            .filter(|p| p.status == PaymentStatus::Failed && p.is_due_for_retry(now))
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.next_retry_at);
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{BillingInterval, InvoiceRef, PlanInput, SubscriptionStatus};
    use crate::domain::foundation::ErrorCode;

    fn plan(name: &str, price_cents: i64, price_id: &str, is_active: bool) -> MembershipPlan {
        MembershipPlan::create(PlanInput {
            name: name.to_string(),
            description: None,
            price_cents,
            currency: "usd".to_string(),
            billing_interval: BillingInterval::Month,
            stripe_price_id: price_id.to_string(),
            is_active,
        })
        .unwrap()
    }

    fn invoice(profile_id: ProfileId, id: &str) -> InvoiceRef {
        InvoiceRef {
            profile_id,
            subscription_id: None,
            stripe_invoice_id: id.to_string(),
            amount_cents: 9900,
            currency: "usd".to_string(),
        }
    }

    #[tokio::test]
    async fn plans_list_by_price_and_reject_duplicate_price_ids() {
        let repo = InMemoryPlanRepository::new();
        repo.create(&plan("Annual", 90000, "price_annual", true)).await.unwrap();
        repo.create(&plan("Monthly", 9900, "price_monthly", true)).await.unwrap();
        repo.create(&plan("Legacy", 5000, "price_legacy", false)).await.unwrap();

        let names: Vec<_> = repo
            .list(false)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Monthly", "Annual"]);

        let err = repo
            .create(&plan("Copy", 100, "price_monthly", true))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn latest_subscription_wins() {
        let repo = InMemorySubscriptionRepository::new();
        let profile_id = ProfileId::new();
        let mut old = Subscription::start(
            profile_id,
            PlanId::new(),
            "cus_1",
            "sub_old",
            SubscriptionStatus::Canceled,
            None,
            false,
        );
        old.created_at = Timestamp::now().add_days(-30);
        let current = Subscription::start(
            profile_id,
            PlanId::new(),
            "cus_1",
            "sub_new",
            SubscriptionStatus::Active,
            None,
            false,
        );
        repo.save(&old).await.unwrap();
        repo.save(&current).await.unwrap();

        let latest = repo.find_latest_for_profile(&profile_id).await.unwrap().unwrap();
        assert_eq!(latest.stripe_subscription_id, "sub_new");
    }

    #[tokio::test]
    async fn due_payments_exclude_future_and_settled_rows() {
        let repo = InMemoryPaymentHistoryRepository::new();
        let profile_id = ProfileId::new();
        let now = Timestamp::now();

        let due = PaymentRecord::failed(invoice(profile_id, "in_due"), 1, Some(now.add_secs(-60)), None);
        let later = PaymentRecord::failed(invoice(profile_id, "in_later"), 1, Some(now.add_days(2)), None);
        let paid = PaymentRecord::succeeded(invoice(profile_id, "in_paid"), 1);
        for payment in [&due, &later, &paid] {
            repo.save(payment).await.unwrap();
        }

        let rows = repo.list_due_for_retry(now, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stripe_invoice_id, "in_due");

        let recent = repo.list_for_profile(&profile_id, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
    }
}
