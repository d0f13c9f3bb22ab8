//! Billing repository ports: plans, subscriptions and payment history.

use async_trait::async_trait;

use crate::domain::billing::{MembershipPlan, PaymentRecord, Subscription};
use crate::domain::foundation::{DomainError, PlanId, ProfileId, Timestamp};

/// Repository for `membership_plans`. Plans are never deleted.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// `Conflict` on a duplicate Stripe price id.
    async fn create(&self, plan: &MembershipPlan) -> Result<(), DomainError>;

    async fn update(&self, plan: &MembershipPlan) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<MembershipPlan>, DomainError>;

    /// Ordered by price.
    async fn list(&self, include_inactive: bool) -> Result<Vec<MembershipPlan>, DomainError>;
}

/// Repository for `subscriptions`.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert or update by `id`.
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError>;

    async fn find_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError>;

    /// The profile's most recently created subscription, whatever its status.
    async fn find_latest_for_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<Subscription>, DomainError>;
}

/// Repository for `payment_history`.
#[async_trait]
pub trait PaymentHistoryRepository: Send + Sync {
    /// Insert or update by `stripe_invoice_id`.
    async fn save(&self, payment: &PaymentRecord) -> Result<(), DomainError>;

    async fn find_by_invoice_id(
        &self,
        stripe_invoice_id: &str,
    ) -> Result<Option<PaymentRecord>, DomainError>;

    /// Newest first.
    async fn list_for_profile(
        &self,
        profile_id: &ProfileId,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, DomainError>;

    /// `failed` rows with `next_retry_at <= now`, oldest due first.
    async fn list_due_for_retry(
        &self,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, DomainError>;
}
