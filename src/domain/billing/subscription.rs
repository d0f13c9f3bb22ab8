//! Subscription aggregate.
//!
//! Local mirror of one provider subscription. Rows are created when checkout
//! completes and then only moved by webhook events and the retry pass.
//!
//! # Invariants
//!
//! - `stripe_subscription_id` is unique
//! - Status changes follow the `SubscriptionStatus` state machine
//! - `current_period_start <= current_period_end` when both are known
//! - The stored period never moves backwards

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, PlanId, ProfileId, StateMachine, SubscriptionId, Timestamp,
};

use super::SubscriptionStatus;

/// A billing period reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl BillingPeriod {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, DomainError> {
        if end.is_before(&start) {
            return Err(DomainError::validation(
                "current_period_end",
                "Billing period ends before it starts",
            ));
        }
        Ok(Self { start, end })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub profile_id: ProfileId,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    pub stripe_customer_id: String,
    pub stripe_subscription_id: String,
    pub current_period_start: Option<Timestamp>,
    pub current_period_end: Option<Timestamp>,
    pub cancel_at_period_end: bool,
    pub canceled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Starts tracking a provider subscription in whatever state the provider
    /// reports at checkout completion.
    pub fn start(
        profile_id: ProfileId,
        plan_id: PlanId,
        stripe_customer_id: impl Into<String>,
        stripe_subscription_id: impl Into<String>,
        status: SubscriptionStatus,
        period: Option<BillingPeriod>,
        cancel_at_period_end: bool,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubscriptionId::new(),
            profile_id,
            plan_id,
            status,
            stripe_customer_id: stripe_customer_id.into(),
            stripe_subscription_id: stripe_subscription_id.into(),
            current_period_start: period.map(|p| p.start),
            current_period_end: period.map(|p| p.end),
            cancel_at_period_end,
            canceled_at: (status == SubscriptionStatus::Canceled).then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_access(&self) -> bool {
        self.status.has_access()
    }

    /// Applies the provider's view of the subscription.
    ///
    /// A repeated status only refreshes the period and the cancellation flag.
    /// A view older than the stored period is rejected without changes.
    pub fn sync_from_provider(
        &mut self,
        status: SubscriptionStatus,
        period: Option<BillingPeriod>,
        cancel_at_period_end: bool,
    ) -> Result<(), DomainError> {
        if let Some(stale) = period.filter(|p| self.is_stale_period(p)) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Period ending {} is older than the stored period",
                    stale.end.as_datetime()
                ),
            ));
        }
        if status != self.status {
            self.transition_to(status)?;
        }
        if let Some(period) = period {
            self.set_period(period);
        }
        self.cancel_at_period_end = cancel_at_period_end;
        if status == SubscriptionStatus::Canceled && self.canceled_at.is_none() {
            self.canceled_at = Some(Timestamp::now());
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// A renewal invoice failed.
    pub fn mark_past_due(&mut self) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::PastDue)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// An invoice was paid: first payment, renewal, or recovery from
    /// `PastDue`/`Unpaid`.
    ///
    /// `Active` and `Trialing` keep their status; a trial's zero-amount first
    /// invoice only refreshes the period.
    pub fn recover(&mut self, period: Option<BillingPeriod>) -> Result<(), DomainError> {
        if !matches!(
            self.status,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing
        ) {
            self.transition_to(SubscriptionStatus::Active)?;
        }
        if let Some(period) = period {
            self.set_period(period);
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::Canceled)?;
        self.canceled_at = Some(Timestamp::now());
        self.cancel_at_period_end = false;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Retries exhausted without payment.
    pub fn mark_unpaid(&mut self) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::Unpaid)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Member asked to stop renewing; access runs to the end of the period.
    pub fn request_cancellation_at_period_end(&mut self) -> Result<(), DomainError> {
        if !self.has_access() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot cancel a subscription in status {}", self.status),
            ));
        }
        self.cancel_at_period_end = true;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// True when `period` ends before the stored period does.
    pub fn is_stale_period(&self, period: &BillingPeriod) -> bool {
        self.current_period_end
            .is_some_and(|end| period.end.is_before(&end))
    }

    fn set_period(&mut self, period: BillingPeriod) {
        if self.is_stale_period(&period) {
            return;
        }
        self.current_period_start = Some(period.start);
        self.current_period_end = Some(period.end);
    }

    fn transition_to(&mut self, target: SubscriptionStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition subscription from {} to {}",
                    self.status, target
                ),
            )
            .with_detail("stripe_subscription_id", self.stripe_subscription_id.clone())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(days_from_now: i64) -> BillingPeriod {
        let start = Timestamp::now().add_days(days_from_now);
        BillingPeriod::new(start, start.add_days(30)).unwrap()
    }

    fn subscription(status: SubscriptionStatus) -> Subscription {
        Subscription::start(
            ProfileId::new(),
            PlanId::new(),
            "cus_123",
            "sub_123",
            status,
            Some(period(0)),
            false,
        )
    }

    #[test]
    fn billing_period_rejects_inverted_range() {
        let now = Timestamp::now();
        assert!(BillingPeriod::new(now, now.add_days(-1)).is_err());
    }

    #[test]
    fn start_records_provider_state() {
        let sub = subscription(SubscriptionStatus::Active);
        assert!(sub.has_access());
        assert!(sub.current_period_end.is_some());
        assert!(sub.canceled_at.is_none());
    }

    #[test]
    fn incomplete_has_no_access_until_recovered() {
        let mut sub = subscription(SubscriptionStatus::Incomplete);
        assert!(!sub.has_access());
        sub.recover(Some(period(0))).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[test]
    fn failed_renewal_then_recovery() {
        let mut sub = subscription(SubscriptionStatus::Active);
        sub.mark_past_due().unwrap();
        assert!(sub.has_access());

        let next = period(30);
        sub.recover(Some(next)).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.current_period_end, Some(next.end));
    }

    #[test]
    fn unpaid_loses_access_but_can_recover() {
        let mut sub = subscription(SubscriptionStatus::PastDue);
        sub.mark_unpaid().unwrap();
        assert!(!sub.has_access());
        sub.recover(None).unwrap();
        assert!(sub.has_access());
    }

    #[test]
    fn paid_invoice_keeps_trial_status() {
        let mut sub = subscription(SubscriptionStatus::Trialing);
        let next = period(14);

        sub.recover(Some(next)).unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Trialing);
        assert_eq!(sub.current_period_end, Some(next.end));
    }

    #[test]
    fn renewal_keeps_active_status() {
        let mut sub = subscription(SubscriptionStatus::Active);
        sub.recover(Some(period(30))).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[test]
    fn older_period_never_replaces_stored_one() {
        let mut sub = subscription(SubscriptionStatus::Active);
        let stored_end = sub.current_period_end;

        sub.recover(Some(period(-60))).unwrap();

        assert_eq!(sub.current_period_end, stored_end);
    }

    #[test]
    fn sync_with_older_period_is_rejected_without_changes() {
        let mut sub = subscription(SubscriptionStatus::Active);
        let before = sub.clone();

        let err = sub
            .sync_from_provider(SubscriptionStatus::PastDue, Some(period(-60)), true)
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(sub, before);
    }

    #[test]
    fn canceled_is_final() {
        let mut sub = subscription(SubscriptionStatus::Active);
        sub.cancel().unwrap();
        assert!(sub.canceled_at.is_some());

        let err = sub.recover(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(sub.status, SubscriptionStatus::Canceled);
    }

    #[test]
    fn sync_with_same_status_refreshes_fields() {
        let mut sub = subscription(SubscriptionStatus::Trialing);
        let next = period(10);
        sub.sync_from_provider(SubscriptionStatus::Trialing, Some(next), true)
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Trialing);
        assert!(sub.cancel_at_period_end);
        assert_eq!(sub.current_period_start, Some(next.start));
    }

    #[test]
    fn sync_rejects_illegal_transition_without_changes() {
        let mut sub = subscription(SubscriptionStatus::Canceled);
        let before = sub.clone();
        assert!(sub
            .sync_from_provider(SubscriptionStatus::Active, Some(period(5)), false)
            .is_err());
        assert_eq!(sub, before);
    }

    #[test]
    fn sync_to_canceled_stamps_canceled_at() {
        let mut sub = subscription(SubscriptionStatus::Active);
        sub.sync_from_provider(SubscriptionStatus::Canceled, None, false)
            .unwrap();
        assert!(sub.canceled_at.is_some());
    }

    #[test]
    fn cancellation_request_needs_access() {
        let mut sub = subscription(SubscriptionStatus::Active);
        sub.request_cancellation_at_period_end().unwrap();
        assert!(sub.cancel_at_period_end);
        assert!(sub.has_access());

        let mut unpaid = subscription(SubscriptionStatus::Unpaid);
        assert!(unpaid.request_cancellation_at_period_end().is_err());
    }
}
