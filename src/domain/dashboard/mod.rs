//! Read models for the member dashboard and the admin overview.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::billing::{PaymentRecord, Subscription, SubscriptionStatus};
use crate::domain::profile::{Profile, Role};

/// Number of payments shown on the member dashboard.
pub const RECENT_PAYMENTS_LIMIT: i64 = 5;

/// A subscription joined with the name of its plan.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionSummary {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub plan_name: String,
    pub has_access: bool,
}

impl SubscriptionSummary {
    pub fn new(subscription: Subscription, plan_name: impl Into<String>) -> Self {
        let has_access = subscription.has_access();
        Self {
            subscription,
            plan_name: plan_name.into(),
            has_access,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberDashboard {
    pub profile: Profile,
    pub subscription: Option<SubscriptionSummary>,
    pub recent_payments: Vec<PaymentRecord>,
}

/// Aggregate counts for the admin overview.
///
/// Maps are keyed by the lowercase role/status names; every known key is
/// present, with zero when no rows match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub profiles_by_role: BTreeMap<String, i64>,
    pub active_locations: i64,
    pub active_gyms: i64,
    pub active_class_types: i64,
    pub subscriptions_by_status: BTreeMap<String, i64>,
}

impl AdminStats {
    /// All counts at zero, with every role and status key present.
    pub fn empty() -> Self {
        Self {
            profiles_by_role: Role::all()
                .iter()
                .map(|r| (r.as_str().to_string(), 0))
                .collect(),
            subscriptions_by_status: SubscriptionStatus::all()
                .iter()
                .map(|s| (s.as_str().to_string(), 0))
                .collect(),
            ..Self::default()
        }
    }

    /// Adds grouped counts on top of the zeroed keys.
    pub fn with_counts(
        mut self,
        profiles_by_role: BTreeMap<String, i64>,
        subscriptions_by_status: BTreeMap<String, i64>,
    ) -> Self {
        self.profiles_by_role.extend(profiles_by_role);
        self.subscriptions_by_status.extend(subscriptions_by_status);
        self
    }
}
