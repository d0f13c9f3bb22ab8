//! Payment history rows, one per provider invoice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    DomainError, ErrorCode, PaymentId, ProfileId, StateMachine, SubscriptionId, Timestamp,
    ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Succeeded,
    Failed,
    /// Retries exhausted locally; no further attempts are made.
    Abandoned,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "succeeded" => Ok(PaymentStatus::Succeeded),
            "failed" => Ok(PaymentStatus::Failed),
            "abandoned" => Ok(PaymentStatus::Abandoned),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown payment status '{}'", other),
            )),
        }
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Failed, Failed) | (Failed, Succeeded) | (Failed, Abandoned) | (Abandoned, Succeeded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Failed => vec![Failed, Succeeded, Abandoned],
            Abandoned => vec![Succeeded],
            Succeeded => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub profile_id: ProfileId,
    pub subscription_id: Option<SubscriptionId>,
    pub stripe_invoice_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub attempt_count: i32,
    pub next_retry_at: Option<Timestamp>,
    pub failure_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Invoice fields shared by both constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRef {
    pub profile_id: ProfileId,
    pub subscription_id: Option<SubscriptionId>,
    pub stripe_invoice_id: String,
    pub amount_cents: i64,
    pub currency: String,
}

impl PaymentRecord {
    pub fn succeeded(invoice: InvoiceRef, attempt_count: i32) -> Self {
        Self::from_invoice(invoice, PaymentStatus::Succeeded, attempt_count, None, None)
    }

    pub fn failed(
        invoice: InvoiceRef,
        attempt_count: i32,
        next_retry_at: Option<Timestamp>,
        message: Option<String>,
    ) -> Self {
        Self::from_invoice(
            invoice,
            PaymentStatus::Failed,
            attempt_count,
            next_retry_at,
            message,
        )
    }

    fn from_invoice(
        invoice: InvoiceRef,
        status: PaymentStatus,
        attempt_count: i32,
        next_retry_at: Option<Timestamp>,
        failure_message: Option<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: PaymentId::new(),
            profile_id: invoice.profile_id,
            subscription_id: invoice.subscription_id,
            stripe_invoice_id: invoice.stripe_invoice_id,
            amount_cents: invoice.amount_cents,
            currency: invoice.currency.to_ascii_lowercase(),
            status,
            attempt_count: attempt_count.max(1),
            next_retry_at,
            failure_message,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_succeeded(&mut self, amount_cents: i64) -> Result<(), DomainError> {
        self.transition_to(PaymentStatus::Succeeded)?;
        self.amount_cents = amount_cents;
        self.next_retry_at = None;
        self.failure_message = None;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records another failed attempt. The attempt count never goes backwards,
    /// so a redelivered older event cannot undo progress.
    pub fn record_failed_attempt(
        &mut self,
        attempt_count: i32,
        next_retry_at: Option<Timestamp>,
        message: Option<String>,
    ) -> Result<(), DomainError> {
        self.transition_to(PaymentStatus::Failed)?;
        self.attempt_count = attempt_count.max(self.attempt_count + 1);
        self.next_retry_at = next_retry_at;
        if message.is_some() {
            self.failure_message = message;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn abandon(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.transition_to(PaymentStatus::Abandoned)?;
        self.next_retry_at = None;
        self.failure_message = Some(reason.into());
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn is_due_for_retry(&self, now: Timestamp) -> bool {
        self.status == PaymentStatus::Failed
            && self.next_retry_at.map_or(false, |at| !at.is_after(&now))
    }

    pub fn attempts_exhausted(&self, max_attempts: i32) -> bool {
        self.attempt_count >= max_attempts
    }

    fn transition_to(&mut self, target: PaymentStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot move payment from {} to {}", self.status, target),
            )
            .with_detail("stripe_invoice_id", self.stripe_invoice_id.clone())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice() -> InvoiceRef {
        InvoiceRef {
            profile_id: ProfileId::new(),
            subscription_id: Some(SubscriptionId::new()),
            stripe_invoice_id: "in_123".into(),
            amount_cents: 9_900,
            currency: "USD".into(),
        }
    }

    #[test]
    fn succeeded_record_is_final() {
        let mut p = PaymentRecord::succeeded(invoice(), 1);
        assert_eq!(p.currency, "usd");
        assert!(p.record_failed_attempt(2, None, None).is_err());
        assert!(p.abandon("x").is_err());
    }

    #[test]
    fn failed_then_succeeded_clears_retry() {
        let due = Timestamp::now().add_days(1);
        let mut p = PaymentRecord::failed(invoice(), 1, Some(due), Some("card_declined".into()));
        p.mark_succeeded(9_900).unwrap();
        assert_eq!(p.status, PaymentStatus::Succeeded);
        assert!(p.next_retry_at.is_none());
        assert!(p.failure_message.is_none());
    }

    #[test]
    fn attempt_count_never_decreases() {
        let mut p = PaymentRecord::failed(invoice(), 3, None, None);
        p.record_failed_attempt(2, None, None).unwrap();
        assert_eq!(p.attempt_count, 4);
        p.record_failed_attempt(7, None, None).unwrap();
        assert_eq!(p.attempt_count, 7);
    }

    #[test]
    fn due_for_retry_only_when_failed_and_time_reached() {
        let now = Timestamp::now();
        let past = PaymentRecord::failed(invoice(), 1, Some(now.add_secs(-60)), None);
        let future = PaymentRecord::failed(invoice(), 1, Some(now.add_secs(60)), None);
        let unscheduled = PaymentRecord::failed(invoice(), 1, None, None);
        let paid = PaymentRecord::succeeded(invoice(), 1);

        assert!(past.is_due_for_retry(now));
        assert!(!future.is_due_for_retry(now));
        assert!(!unscheduled.is_due_for_retry(now));
        assert!(!paid.is_due_for_retry(now));
    }

    #[test]
    fn abandon_stops_retries_but_allows_late_payment() {
        let mut p = PaymentRecord::failed(invoice(), 4, Some(Timestamp::now()), None);
        assert!(p.attempts_exhausted(4));
        p.abandon("Maximum attempts reached").unwrap();
        assert!(!p.is_due_for_retry(Timestamp::now().add_days(1)));
        p.mark_succeeded(9_900).unwrap();
        assert_eq!(p.status, PaymentStatus::Succeeded);
    }

    #[test]
    fn payment_status_round_trips_through_strings() {
        for s in [PaymentStatus::Succeeded, PaymentStatus::Failed, PaymentStatus::Abandoned] {
            assert_eq!(s.as_str().parse::<PaymentStatus>().unwrap(), s);
        }
    }
}
