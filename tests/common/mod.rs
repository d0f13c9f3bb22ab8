//! Shared harness: the full router over in-memory adapters and mocks.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use academy_hub::adapters::auth::{MockIdentityProvider, MockSessionValidator};
use academy_hub::adapters::http::{build_router, AppState, HttpSettings};
use academy_hub::adapters::memory::{
    InMemoryCatalog, InMemoryDashboardReader, InMemoryPaymentHistoryRepository,
    InMemoryPlanRepository, InMemoryProfileRepository, InMemorySubscriptionRepository,
    InMemoryWebhookEventRepository,
};
use academy_hub::adapters::stripe::MockPaymentProvider;
use academy_hub::application::handlers::billing::{BillingUrls, RetryPolicy};
use academy_hub::config::ServerConfig;
use academy_hub::domain::foundation::{AuthenticatedUser, ProfileId};
use academy_hub::domain::profile::{Profile, Role};

pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const CRON_SECRET: &str = "cron-secret-integration";

pub struct TestApp {
    pub router: Router,
    pub profiles: Arc<InMemoryProfileRepository>,
    pub catalog: Arc<InMemoryCatalog>,
    pub plans: Arc<InMemoryPlanRepository>,
    pub subscriptions: Arc<InMemorySubscriptionRepository>,
    pub payments: Arc<InMemoryPaymentHistoryRepository>,
    pub webhook_events: Arc<InMemoryWebhookEventRepository>,
    pub provider: Arc<MockPaymentProvider>,
    pub identity: Arc<MockIdentityProvider>,
    pub validator: Arc<MockSessionValidator>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_identity(MockIdentityProvider::new())
    }

    pub fn with_identity(identity: MockIdentityProvider) -> Self {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let plans = Arc::new(InMemoryPlanRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let payments = Arc::new(InMemoryPaymentHistoryRepository::new());
        let webhook_events = Arc::new(InMemoryWebhookEventRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());
        let identity = Arc::new(identity);
        let validator = Arc::new(MockSessionValidator::new());
        let dashboard = Arc::new(InMemoryDashboardReader::new(
            profiles.clone(),
            catalog.clone(),
            subscriptions.clone(),
        ));

        let settings = HttpSettings {
            billing_urls: BillingUrls {
                checkout_success: "https://academy.test/billing?checkout=success".to_string(),
                checkout_cancel: "https://academy.test/billing?checkout=cancel".to_string(),
                portal_return: "https://academy.test/billing".to_string(),
            },
            password_reset_redirect: "https://academy.test/reset-password".to_string(),
            webhook_secret: SecretString::new(WEBHOOK_SECRET.to_string()),
            require_livemode: false,
            cron_secret: SecretString::new(CRON_SECRET.to_string()),
            retry_policy: RetryPolicy {
                max_attempts: 4,
                batch_size: 50,
                webhook_retention_days: 30,
            },
        };

        let state = AppState {
            profiles: profiles.clone(),
            locations: catalog.clone(),
            gyms: catalog.clone(),
            class_types: catalog.clone(),
            plans: plans.clone(),
            subscriptions: subscriptions.clone(),
            payments: payments.clone(),
            webhook_events: webhook_events.clone(),
            dashboard,
            session_validator: validator.clone(),
            identity: identity.clone(),
            payment_provider: provider.clone(),
            settings: Arc::new(settings),
        };

        Self {
            router: build_router(state, &ServerConfig::default()),
            profiles,
            catalog,
            plans,
            subscriptions,
            payments,
            webhook_events,
            provider,
            identity,
            validator,
        }
    }

    /// Registers `token` for a new profile with `role` and returns its id.
    pub async fn user_with_role(&self, token: &str, role: Role) -> ProfileId {
        let id = ProfileId::new();
        let email = format!("{}@academy.test", token);
        let mut profile = Profile::create(id, email.clone(), Some(format!("User {}", token)));
        profile.change_role(role);
        self.profiles.insert(profile).await;
        self.validator
            .add_token(token, AuthenticatedUser::new(id, email, token));
        id
    }

    pub async fn member(&self, token: &str) -> ProfileId {
        self.user_with_role(token, Role::Member).await
    }

    pub async fn admin(&self, token: &str) -> ProfileId {
        self.user_with_role(token, Role::Admin).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn call(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }
}
