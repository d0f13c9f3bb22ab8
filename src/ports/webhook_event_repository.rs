//! WebhookEventRepository port - tracks processed Stripe webhook events.
//!
//! Stripe may deliver the same event several times (timeouts, 5xx answers,
//! lost acknowledgements). The stored record, keyed on the event id, is what
//! makes processing idempotent; it also keeps the payload for auditing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ValidationError};

/// How processing of an event ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Success,
    Ignored,
    /// Handler failed; a redelivery is processed again.
    Failed,
}

impl WebhookOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookOutcome::Success => "success",
            WebhookOutcome::Ignored => "ignored",
            WebhookOutcome::Failed => "failed",
        }
    }
}

impl fmt::Display for WebhookOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookOutcome {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(WebhookOutcome::Success),
            "ignored" => Ok(WebhookOutcome::Ignored),
            "failed" => Ok(WebhookOutcome::Failed),
            other => Err(ValidationError::invalid_format(
                "result",
                format!("unknown webhook outcome '{}'", other),
            )),
        }
    }
}

/// Record of a processed webhook event.
#[derive(Debug, Clone)]
pub struct WebhookEventRecord {
    /// Stripe event ID (evt_xxx format).
    pub event_id: String,

    /// Type of Stripe event (e.g., "checkout.session.completed").
    pub event_type: String,

    /// When the event was processed.
    pub processed_at: DateTime<Utc>,

    pub outcome: WebhookOutcome,

    /// Error or ignore reason.
    pub error_message: Option<String>,

    /// Original event payload for debugging.
    pub payload: serde_json::Value,
}

impl WebhookEventRecord {
    fn new(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        outcome: WebhookOutcome,
        error_message: Option<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            outcome,
            error_message,
            payload,
        }
    }

    pub fn success(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self::new(event_id, event_type, WebhookOutcome::Success, None, payload)
    }

    pub fn ignored(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        reason: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self::new(
            event_id,
            event_type,
            WebhookOutcome::Ignored,
            Some(reason.into()),
            payload,
        )
    }

    pub fn failed(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        error: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self::new(
            event_id,
            event_type,
            WebhookOutcome::Failed,
            Some(error.into()),
            payload,
        )
    }
}

/// Result of attempting to save a webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Record was written (first sighting, or replacing a failed attempt).
    Inserted,
    /// A non-failed record already exists (duplicate event).
    AlreadyExists,
}

/// Port for storing and retrieving processed webhook events.
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    /// Find a previously processed event by its Stripe event ID.
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError>;

    /// Save a record.
    ///
    /// Inserts, or overwrites an existing `failed` record. Any other existing
    /// record wins and `AlreadyExists` is returned.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError>;

    /// Delete records processed before `timestamp`; returns the count.
    async fn delete_before(&self, timestamp: DateTime<Utc>) -> Result<u64, DomainError>;
}

/// Result of webhook processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookResult {
    /// Event was processed (handled or ignored).
    Processed,
    /// Event was already processed (idempotent skip).
    AlreadyProcessed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_carry_outcome_and_reason() {
        let ok = WebhookEventRecord::success("evt_1", "invoice.paid", serde_json::json!({}));
        assert_eq!(ok.outcome, WebhookOutcome::Success);
        assert!(ok.error_message.is_none());

        let ignored =
            WebhookEventRecord::ignored("evt_2", "charge.refunded", "unhandled", serde_json::json!({}));
        assert_eq!(ignored.outcome, WebhookOutcome::Ignored);
        assert_eq!(ignored.error_message.as_deref(), Some("unhandled"));

        let failed =
            WebhookEventRecord::failed("evt_3", "invoice.paid", "db down", serde_json::json!({}));
        assert_eq!(failed.outcome, WebhookOutcome::Failed);
    }

    #[test]
    fn outcome_round_trips_through_strings() {
        for outcome in [WebhookOutcome::Success, WebhookOutcome::Ignored, WebhookOutcome::Failed] {
            assert_eq!(outcome.as_str().parse::<WebhookOutcome>().unwrap(), outcome);
        }
        assert!("done".parse::<WebhookOutcome>().is_err());
    }

    #[test]
    fn webhook_event_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn WebhookEventRepository) {}
    }
}
