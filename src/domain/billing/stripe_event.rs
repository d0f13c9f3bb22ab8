//! Stripe webhook event types.
//!
//! Only the fields the webhook handlers read are captured; everything else in
//! Stripe's payloads is ignored during deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::Timestamp;

use super::{BillingPeriod, SubscriptionStatus};

/// Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }
}

/// Event types the billing webhook acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripeEventType {
    CheckoutSessionCompleted,
    /// `invoice.paid` and `invoice.payment_succeeded` are handled alike.
    InvoicePaid,
    InvoicePaymentFailed,
    CustomerSubscriptionUpdated,
    CustomerSubscriptionDeleted,
    Unknown,
}

impl StripeEventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "invoice.paid" | "invoice.payment_succeeded" => Self::InvoicePaid,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            "customer.subscription.updated" => Self::CustomerSubscriptionUpdated,
            "customer.subscription.deleted" => Self::CustomerSubscriptionDeleted,
            _ => Self::Unknown,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Object Types
// ════════════════════════════════════════════════════════════════════════════════

/// `checkout.session` object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub client_reference_id: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// `subscription` object.
///
/// Newer API versions moved the period fields onto the subscription items, so
/// both places are read.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionObject {
    pub id: String,
    pub customer: String,
    pub status: String,
    #[serde(default)]
    pub current_period_start: Option<i64>,
    #[serde(default)]
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub canceled_at: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub items: SubscriptionItems,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubscriptionItems {
    #[serde(default)]
    pub data: Vec<SubscriptionItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionItem {
    #[serde(default)]
    pub current_period_start: Option<i64>,
    #[serde(default)]
    pub current_period_end: Option<i64>,
}

impl SubscriptionObject {
    /// Provider status parsed into the local state machine.
    ///
    /// `None` for statuses with no local meaning (e.g. `paused`).
    pub fn status(&self) -> Option<SubscriptionStatus> {
        self.status.parse().ok()
    }

    pub fn period(&self) -> Option<BillingPeriod> {
        let item = self.items.data.first();
        let start = self
            .current_period_start
            .or_else(|| item.and_then(|i| i.current_period_start))?;
        let end = self
            .current_period_end
            .or_else(|| item.and_then(|i| i.current_period_end))?;
        period_from_unix(start, end)
    }
}

/// `invoice` object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceObject {
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub attempt_count: i32,
    #[serde(default)]
    pub next_payment_attempt: Option<i64>,
    #[serde(default)]
    pub period_start: Option<i64>,
    #[serde(default)]
    pub period_end: Option<i64>,
    #[serde(default)]
    pub lines: InvoiceLines,
    #[serde(default)]
    pub last_finalization_error: Option<InvoiceError>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InvoiceLines {
    #[serde(default)]
    pub data: Vec<InvoiceLine>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceLine {
    pub period: InvoiceLinePeriod,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceLinePeriod {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceError {
    #[serde(default)]
    pub message: Option<String>,
}

impl InvoiceObject {
    /// Service period the invoice pays for, taken from its first line item.
    pub fn service_period(&self) -> Option<BillingPeriod> {
        let line = self.lines.data.first()?;
        period_from_unix(line.period.start, line.period.end)
    }

    pub fn next_attempt_at(&self) -> Option<Timestamp> {
        self.next_payment_attempt.and_then(Timestamp::from_unix_secs)
    }

    pub fn failure_message(&self) -> Option<String> {
        self.last_finalization_error
            .as_ref()
            .and_then(|e| e.message.clone())
    }
}

fn period_from_unix(start: i64, end: i64) -> Option<BillingPeriod> {
    let start = Timestamp::from_unix_secs(start)?;
    let end = Timestamp::from_unix_secs(end)?;
    BillingPeriod::new(start, end).ok()
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "checkout.session.completed".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: self.livemode,
            api_version: Some("2024-06-20".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ══════════════════════════════════════════════════════════════
    // Envelope
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn deserialize_minimal_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "invoice.paid",
            "created": 1704067200,
            "data": { "object": {} },
            "livemode": false
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert_eq!(event.parsed_type(), StripeEventType::InvoicePaid);
        assert!(event.api_version.is_none());
    }

    #[test]
    fn both_invoice_success_names_map_to_paid() {
        assert_eq!(StripeEventType::parse("invoice.paid"), StripeEventType::InvoicePaid);
        assert_eq!(
            StripeEventType::parse("invoice.payment_succeeded"),
            StripeEventType::InvoicePaid
        );
        assert_eq!(StripeEventType::parse("charge.refunded"), StripeEventType::Unknown);
    }

    // ══════════════════════════════════════════════════════════════
    // Objects
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn subscription_period_falls_back_to_items() {
        let event = StripeEventBuilder::new()
            .event_type("customer.subscription.updated")
            .object(json!({
                "id": "sub_1",
                "customer": "cus_1",
                "status": "active",
                "items": { "data": [ { "current_period_start": 1704067200, "current_period_end": 1706745600 } ] }
            }))
            .build();

        let sub: SubscriptionObject = event.deserialize_object().unwrap();
        let period = sub.period().unwrap();
        assert_eq!(period.start.as_unix_secs(), 1704067200);
        assert_eq!(period.end.as_unix_secs(), 1706745600);
        assert_eq!(sub.status(), Some(SubscriptionStatus::Active));
    }

    #[test]
    fn subscription_unknown_status_is_none() {
        let sub: SubscriptionObject = serde_json::from_value(json!({
            "id": "sub_1", "customer": "cus_1", "status": "paused"
        }))
        .unwrap();
        assert!(sub.status().is_none());
        assert!(sub.period().is_none());
    }

    #[test]
    fn invoice_exposes_retry_schedule_and_period() {
        let invoice: InvoiceObject = serde_json::from_value(json!({
            "id": "in_1",
            "customer": "cus_1",
            "subscription": "sub_1",
            "amount_due": 5000,
            "currency": "usd",
            "attempt_count": 2,
            "next_payment_attempt": 1704153600,
            "lines": { "data": [ { "period": { "start": 1704067200, "end": 1706745600 } } ] }
        }))
        .unwrap();

        assert_eq!(invoice.attempt_count, 2);
        assert_eq!(invoice.next_attempt_at().unwrap().as_unix_secs(), 1704153600);
        assert!(invoice.service_period().is_some());
        assert!(invoice.failure_message().is_none());
    }

    #[test]
    fn checkout_session_reads_metadata() {
        let session: CheckoutSessionObject = serde_json::from_value(json!({
            "id": "cs_1",
            "customer": "cus_1",
            "subscription": "sub_1",
            "client_reference_id": "abc",
            "metadata": { "profile_id": "p", "plan_id": "q" }
        }))
        .unwrap();
        assert_eq!(session.metadata.get("plan_id").map(String::as_str), Some("q"));
    }
}
