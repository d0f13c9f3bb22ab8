//! Shared application state.
//!
//! Cloned for each request; holds Arc-wrapped ports and builds application
//! handlers on demand.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::application::handlers::auth::{
    RequestPasswordResetHandler, SignInHandler, SignUpHandler, UpdatePasswordHandler,
};
use crate::application::handlers::billing::{
    BillingUrls, CancelSubscriptionHandler, CreatePlanHandler, GetMySubscriptionHandler,
    HandleStripeWebhookHandler, ListMyPaymentsHandler, ListPlansHandler,
    OpenBillingPortalHandler, ProcessRetriesHandler, RetryPolicy, StartCheckoutHandler,
    StripeWebhookDispatcher, UpdatePlanHandler,
};
use crate::application::handlers::catalog::{
    CreateClassTypeHandler, CreateGymHandler, CreateLocationHandler, DeleteClassTypeHandler,
    DeleteGymHandler, DeleteLocationHandler, GetClassTypeHandler, GetGymHandler,
    GetLocationHandler, ListClassTypesHandler, ListGymsHandler, ListLocationsHandler,
    UpdateClassTypeHandler, UpdateGymHandler, UpdateLocationHandler,
};
use crate::application::handlers::dashboard::{GetAdminStatsHandler, GetMemberDashboardHandler};
use crate::application::handlers::profile::{
    ChangeRoleHandler, GetProfileHandler, ListProfilesHandler, UpdateProfileHandler,
};
use crate::config::AppConfig;
use crate::domain::billing::{IdempotentWebhookProcessor, StripeWebhookVerifier};
use crate::ports::{
    ClassTypeRepository, DashboardReader, GymRepository, IdentityProvider, LocationRepository,
    PaymentHistoryRepository, PaymentProvider, PlanRepository, ProfileRepository,
    SessionValidator, SubscriptionRepository, WebhookEventRepository,
};

/// Values the HTTP layer needs from configuration.
pub struct HttpSettings {
    pub billing_urls: BillingUrls,
    pub password_reset_redirect: String,
    pub webhook_secret: SecretString,
    pub require_livemode: bool,
    pub cron_secret: SecretString,
    pub retry_policy: RetryPolicy,
}

impl HttpSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        let site = &config.server;
        Self {
            billing_urls: BillingUrls {
                checkout_success: site.site_link("/billing?checkout=success"),
                checkout_cancel: site.site_link("/billing?checkout=cancel"),
                portal_return: site.site_link("/billing"),
            },
            password_reset_redirect: site.site_link("/reset-password"),
            webhook_secret: config.payment.webhook_secret(),
            require_livemode: config.payment.require_livemode,
            cron_secret: config.cron.secret(),
            retry_policy: RetryPolicy::from(&config.cron),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub gyms: Arc<dyn GymRepository>,
    pub class_types: Arc<dyn ClassTypeRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub payments: Arc<dyn PaymentHistoryRepository>,
    pub webhook_events: Arc<dyn WebhookEventRepository>,
    pub dashboard: Arc<dyn DashboardReader>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub identity: Arc<dyn IdentityProvider>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub settings: Arc<HttpSettings>,
}

impl AppState {
    // ════════════════════════════════════════════════════════════════════════════
    // Auth and profiles
    // ════════════════════════════════════════════════════════════════════════════

    pub fn sign_up_handler(&self) -> SignUpHandler {
        SignUpHandler::new(self.identity.clone(), self.profiles.clone())
    }

    pub fn sign_in_handler(&self) -> SignInHandler {
        SignInHandler::new(self.identity.clone())
    }

    pub fn password_reset_handler(&self) -> RequestPasswordResetHandler {
        RequestPasswordResetHandler::new(
            self.identity.clone(),
            self.settings.password_reset_redirect.clone(),
        )
    }

    pub fn update_password_handler(&self) -> UpdatePasswordHandler {
        UpdatePasswordHandler::new(self.identity.clone())
    }

    pub fn get_profile_handler(&self) -> GetProfileHandler {
        GetProfileHandler::new(self.profiles.clone())
    }

    pub fn update_profile_handler(&self) -> UpdateProfileHandler {
        UpdateProfileHandler::new(self.profiles.clone())
    }

    pub fn list_profiles_handler(&self) -> ListProfilesHandler {
        ListProfilesHandler::new(self.profiles.clone())
    }

    pub fn change_role_handler(&self) -> ChangeRoleHandler {
        ChangeRoleHandler::new(self.profiles.clone())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Catalog
    // ════════════════════════════════════════════════════════════════════════════

    pub fn list_locations_handler(&self) -> ListLocationsHandler {
        ListLocationsHandler::new(self.locations.clone())
    }

    pub fn get_location_handler(&self) -> GetLocationHandler {
        GetLocationHandler::new(self.locations.clone())
    }

    pub fn create_location_handler(&self) -> CreateLocationHandler {
        CreateLocationHandler::new(self.locations.clone())
    }

    pub fn update_location_handler(&self) -> UpdateLocationHandler {
        UpdateLocationHandler::new(self.locations.clone())
    }

    pub fn delete_location_handler(&self) -> DeleteLocationHandler {
        DeleteLocationHandler::new(self.locations.clone())
    }

    pub fn list_gyms_handler(&self) -> ListGymsHandler {
        ListGymsHandler::new(self.gyms.clone())
    }

    pub fn get_gym_handler(&self) -> GetGymHandler {
        GetGymHandler::new(self.gyms.clone())
    }

    pub fn create_gym_handler(&self) -> CreateGymHandler {
        CreateGymHandler::new(self.gyms.clone(), self.locations.clone())
    }

    pub fn update_gym_handler(&self) -> UpdateGymHandler {
        UpdateGymHandler::new(self.gyms.clone(), self.locations.clone())
    }

    pub fn delete_gym_handler(&self) -> DeleteGymHandler {
        DeleteGymHandler::new(self.gyms.clone())
    }

    pub fn list_class_types_handler(&self) -> ListClassTypesHandler {
        ListClassTypesHandler::new(self.class_types.clone())
    }

    pub fn get_class_type_handler(&self) -> GetClassTypeHandler {
        GetClassTypeHandler::new(self.class_types.clone())
    }

    pub fn create_class_type_handler(&self) -> CreateClassTypeHandler {
        CreateClassTypeHandler::new(self.class_types.clone())
    }

    pub fn update_class_type_handler(&self) -> UpdateClassTypeHandler {
        UpdateClassTypeHandler::new(self.class_types.clone())
    }

    pub fn delete_class_type_handler(&self) -> DeleteClassTypeHandler {
        DeleteClassTypeHandler::new(self.class_types.clone())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Billing
    // ════════════════════════════════════════════════════════════════════════════

    pub fn list_plans_handler(&self) -> ListPlansHandler {
        ListPlansHandler::new(self.plans.clone())
    }

    pub fn create_plan_handler(&self) -> CreatePlanHandler {
        CreatePlanHandler::new(self.plans.clone())
    }

    pub fn update_plan_handler(&self) -> UpdatePlanHandler {
        UpdatePlanHandler::new(self.plans.clone())
    }

    pub fn my_subscription_handler(&self) -> GetMySubscriptionHandler {
        GetMySubscriptionHandler::new(self.subscriptions.clone(), self.plans.clone())
    }

    pub fn my_payments_handler(&self) -> ListMyPaymentsHandler {
        ListMyPaymentsHandler::new(self.payments.clone())
    }

    pub fn start_checkout_handler(&self) -> StartCheckoutHandler {
        StartCheckoutHandler::new(
            self.plans.clone(),
            self.subscriptions.clone(),
            self.profiles.clone(),
            self.payment_provider.clone(),
            self.settings.billing_urls.clone(),
        )
    }

    pub fn billing_portal_handler(&self) -> OpenBillingPortalHandler {
        OpenBillingPortalHandler::new(
            self.profiles.clone(),
            self.payment_provider.clone(),
            self.settings.billing_urls.portal_return.clone(),
        )
    }

    pub fn cancel_subscription_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(self.subscriptions.clone(), self.payment_provider.clone())
    }

    pub fn webhook_handler(&self) -> HandleStripeWebhookHandler<StripeWebhookDispatcher> {
        let dispatcher = StripeWebhookDispatcher::billing(
            self.profiles.clone(),
            self.plans.clone(),
            self.subscriptions.clone(),
            self.payments.clone(),
            self.payment_provider.clone(),
        );
        let processor = IdempotentWebhookProcessor::new(self.webhook_events.clone(), dispatcher)
            .with_require_livemode(self.settings.require_livemode);
        let secret = SecretString::new(self.settings.webhook_secret.expose_secret().clone());

        HandleStripeWebhookHandler::new(StripeWebhookVerifier::new(secret), processor)
    }

    pub fn retries_handler(&self) -> ProcessRetriesHandler {
        ProcessRetriesHandler::new(
            self.payments.clone(),
            self.subscriptions.clone(),
            self.payment_provider.clone(),
            self.webhook_events.clone(),
            self.settings.retry_policy,
        )
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Dashboard
    // ════════════════════════════════════════════════════════════════════════════

    pub fn member_dashboard_handler(&self) -> GetMemberDashboardHandler {
        GetMemberDashboardHandler::new(
            self.profiles.clone(),
            self.subscriptions.clone(),
            self.plans.clone(),
            self.payments.clone(),
        )
    }

    pub fn admin_stats_handler(&self) -> GetAdminStatsHandler {
        GetAdminStatsHandler::new(self.dashboard.clone())
    }
}
