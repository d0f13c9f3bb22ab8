//! GetMemberDashboardHandler - Query handler for the member home page.

use std::sync::Arc;

use crate::application::handlers::billing::GetMySubscriptionHandler;
use crate::application::handlers::profile::{GetProfileHandler, GetProfileQuery};
use crate::domain::dashboard::{MemberDashboard, RECENT_PAYMENTS_LIMIT};
use crate::domain::foundation::{DomainError, ProfileId};
use crate::ports::{PaymentHistoryRepository, PlanRepository, ProfileRepository, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct GetMemberDashboardQuery {
    pub profile_id: ProfileId,
    /// Used when the profile row does not exist yet.
    pub email: String,
}

/// Profile, current subscription and the last few payments in one read.
pub struct GetMemberDashboardHandler {
    profile: GetProfileHandler,
    subscription: GetMySubscriptionHandler,
    payments: Arc<dyn PaymentHistoryRepository>,
}

impl GetMemberDashboardHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanRepository>,
        payments: Arc<dyn PaymentHistoryRepository>,
    ) -> Self {
        Self {
            profile: GetProfileHandler::new(profiles),
            subscription: GetMySubscriptionHandler::new(subscriptions, plans),
            payments,
        }
    }

    pub async fn handle(&self, query: GetMemberDashboardQuery) -> Result<MemberDashboard, DomainError> {
        let profile = self
            .profile
            .handle(GetProfileQuery {
                profile_id: query.profile_id,
                email: query.email,
            })
            .await?;
        let (subscription, recent_payments) = futures::try_join!(
            self.subscription.handle(profile.id),
            self.payments
                .list_for_profile(&profile.id, RECENT_PAYMENTS_LIMIT),
        )?;

        Ok(MemberDashboard {
            profile,
            subscription,
            recent_payments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPaymentHistoryRepository, InMemoryPlanRepository, InMemoryProfileRepository,
        InMemorySubscriptionRepository,
    };
    use crate::domain::billing::{
        BillingInterval, InvoiceRef, MembershipPlan, PaymentRecord, PlanInput, Subscription,
        SubscriptionStatus,
    };

    #[tokio::test]
    async fn first_visit_creates_profile_with_empty_billing() {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let handler = GetMemberDashboardHandler::new(
            profiles.clone(),
            Arc::new(InMemorySubscriptionRepository::new()),
            Arc::new(InMemoryPlanRepository::new()),
            Arc::new(InMemoryPaymentHistoryRepository::new()),
        );
        let profile_id = ProfileId::new();

        let dashboard = handler
            .handle(GetMemberDashboardQuery {
                profile_id,
                email: "new@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(dashboard.profile.email, "new@example.com");
        assert!(dashboard.subscription.is_none());
        assert!(dashboard.recent_payments.is_empty());
        assert!(profiles.find_by_id(&profile_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn shows_plan_name_and_last_five_payments() {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let plans = Arc::new(InMemoryPlanRepository::new());
        let payments = Arc::new(InMemoryPaymentHistoryRepository::new());
        let profile_id = ProfileId::new();

        let plan = MembershipPlan::create(PlanInput {
            name: "Unlimited".to_string(),
            description: None,
            price_cents: 8900,
            currency: "eur".to_string(),
            billing_interval: BillingInterval::Month,
            stripe_price_id: "price_unlimited".to_string(),
            is_active: true,
        })
        .unwrap();
        plans.create(&plan).await.unwrap();
        let sub = Subscription::start(
            profile_id,
            plan.id,
            "cus_1",
            "sub_1",
            SubscriptionStatus::Active,
            None,
            false,
        );
        subscriptions.save(&sub).await.unwrap();
        for n in 0..7 {
            payments
                .save(&PaymentRecord::succeeded(
                    InvoiceRef {
                        profile_id,
                        subscription_id: Some(sub.id),
                        stripe_invoice_id: format!("in_{}", n),
                        amount_cents: 8900,
                        currency: "eur".to_string(),
                    },
                    1,
                ))
                .await
                .unwrap();
        }

        let dashboard = GetMemberDashboardHandler::new(profiles, subscriptions, plans, payments)
            .handle(GetMemberDashboardQuery {
                profile_id,
                email: "m@example.com".to_string(),
            })
            .await
            .unwrap();

        let summary = dashboard.subscription.unwrap();
        assert_eq!(summary.plan_name, "Unlimited");
        assert!(summary.has_access);
        assert_eq!(dashboard.recent_payments.len(), 5);
    }
}
