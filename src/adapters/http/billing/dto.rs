//! Request and response bodies for billing endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::billing::Subscription;
use crate::domain::dashboard::SubscriptionSummary;
use crate::domain::foundation::PlanId;

/// Page size when `?limit=` is absent.
pub const DEFAULT_PAYMENTS_PAGE: i64 = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub plan_id: PlanId,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaymentsParams {
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PaymentsParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAYMENTS_PAGE)
    }
}

/// Body of `GET /api/billing/subscription`; `subscription` is null when the
/// member never subscribed.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub subscription: Option<SubscriptionSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelResponse {
    pub subscription: Subscription,
}
