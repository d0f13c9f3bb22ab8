//! Subscription status state machine.
//!
//! Mirrors the payments provider's subscription lifecycle so webhook
//! payloads map onto it one to one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Created by checkout, first invoice not yet paid.
    Incomplete,

    /// First invoice never paid within the provider's window. No access.
    IncompleteExpired,

    /// Trial period; full access.
    Trialing,

    /// Paid and current.
    Active,

    /// Renewal payment failed; the provider keeps retrying. Access retained.
    PastDue,

    /// Retries exhausted; subscription kept but no access.
    Unpaid,

    /// Ended. No access; a new checkout creates a new subscription.
    Canceled,
}

impl SubscriptionStatus {
    /// Returns true if this status grants access to classes.
    pub fn has_access(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing | SubscriptionStatus::PastDue
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::IncompleteExpired => "incomplete_expired",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    pub fn all() -> [SubscriptionStatus; 7] {
        use SubscriptionStatus::*;
        [Incomplete, IncompleteExpired, Trialing, Active, PastDue, Unpaid, Canceled]
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubscriptionStatus::all()
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("status", format!("unknown subscription status '{}'", s))
            })
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            (Incomplete, Active)
                | (Incomplete, Trialing)
                | (Incomplete, IncompleteExpired)
                | (Trialing, Active)
                | (Trialing, PastDue)
                | (Trialing, Canceled)
                | (Trialing, Unpaid)
                | (Active, Active) // Renewal
                | (Active, PastDue)
                | (Active, Canceled)
                | (Active, Unpaid)
                | (PastDue, PastDue) // Another failed attempt
                | (PastDue, Active)
                | (PastDue, Canceled)
                | (PastDue, Unpaid)
                | (Unpaid, Active)
                | (Unpaid, Canceled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Incomplete => vec![Active, Trialing, IncompleteExpired],
            Trialing => vec![Active, PastDue, Canceled, Unpaid],
            Active => vec![Active, PastDue, Canceled, Unpaid],
            PastDue => vec![PastDue, Active, Canceled, Unpaid],
            Unpaid => vec![Active, Canceled],
            Canceled | IncompleteExpired => vec![],
        }
    }
}
