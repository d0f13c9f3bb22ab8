//! Checkout and billing portal handlers.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, ProfileId};
use crate::domain::profile::Profile;
use crate::ports::{
    CreateCheckoutRequest, CreateCustomerRequest, HostedSession, PaymentProvider, PlanRepository,
    ProfileRepository, SubscriptionRepository,
};

/// Redirect targets on the member site.
#[derive(Debug, Clone)]
pub struct BillingUrls {
    pub checkout_success: String,
    pub checkout_cancel: String,
    pub portal_return: String,
}

#[derive(Debug, Clone, Copy)]
pub struct StartCheckoutCommand {
    pub profile_id: ProfileId,
    pub plan_id: PlanId,
}

/// Creates a hosted checkout session for a plan.
///
/// The provider customer is created on first checkout and its id stored on
/// the profile, so later checkouts and the portal reuse it.
pub struct StartCheckoutHandler {
    plans: Arc<dyn PlanRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    profiles: Arc<dyn ProfileRepository>,
    provider: Arc<dyn PaymentProvider>,
    urls: BillingUrls,
}

impl StartCheckoutHandler {
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        profiles: Arc<dyn ProfileRepository>,
        provider: Arc<dyn PaymentProvider>,
        urls: BillingUrls,
    ) -> Self {
        Self {
            plans,
            subscriptions,
            profiles,
            provider,
            urls,
        }
    }

    pub async fn handle(&self, cmd: StartCheckoutCommand) -> Result<HostedSession, DomainError> {
        let plan = self
            .plans
            .find_by_id(&cmd.plan_id)
            .await?
            .ok_or_else(|| DomainError::not_found("plan", cmd.plan_id))?;
        if !plan.is_active {
            return Err(DomainError::validation(
                "plan_id",
                "This plan is no longer offered",
            ));
        }

        if let Some(current) = self
            .subscriptions
            .find_latest_for_profile(&cmd.profile_id)
            .await?
        {
            if current.has_access() {
                return Err(DomainError::conflict("You already have an active subscription")
                    .with_detail("status", current.status.to_string()));
            }
        }

        let mut profile = self
            .profiles
            .find_by_id(&cmd.profile_id)
            .await?
            .ok_or_else(|| DomainError::not_found("profile", cmd.profile_id))?;
        let customer_id = self.ensure_customer(&mut profile).await?;

        let session = self
            .provider
            .create_checkout_session(CreateCheckoutRequest {
                customer_id,
                price_id: plan.stripe_price_id.clone(),
                profile_id: profile.id,
                plan_id: plan.id,
                success_url: self.urls.checkout_success.clone(),
                cancel_url: self.urls.checkout_cancel.clone(),
            })
            .await?;

        tracing::info!(profile_id = %profile.id, plan_id = %plan.id, session_id = %session.id, "Checkout started");
        Ok(session)
    }

    async fn ensure_customer(&self, profile: &mut Profile) -> Result<String, DomainError> {
        if let Some(id) = &profile.stripe_customer_id {
            return Ok(id.clone());
        }

        let customer_id = self
            .provider
            .create_customer(CreateCustomerRequest {
                profile_id: profile.id,
                email: profile.email.clone(),
                name: profile.full_name.clone(),
            })
            .await?;

        profile.stripe_customer_id = Some(customer_id.clone());
        self.profiles.update(profile).await?;
        Ok(customer_id)
    }
}

/// Opens the provider's hosted billing portal for the caller.
pub struct OpenBillingPortalHandler {
    profiles: Arc<dyn ProfileRepository>,
    provider: Arc<dyn PaymentProvider>,
    return_url: String,
}

impl OpenBillingPortalHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        provider: Arc<dyn PaymentProvider>,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            profiles,
            provider,
            return_url: return_url.into(),
        }
    }

    pub async fn handle(&self, profile_id: ProfileId) -> Result<HostedSession, DomainError> {
        let customer_id = self
            .profiles
            .find_by_id(&profile_id)
            .await?
            .and_then(|p| p.stripe_customer_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::NotFound, "No billing account yet")
                    .with_detail("resource", "billing_customer")
            })?;

        let session = self
            .provider
            .create_portal_session(&customer_id, &self.return_url)
            .await?;
        Ok(session)
    }
}
