//! Webhook processor - Orchestrates idempotent webhook event handling.
//!
//! Steps per delivery:
//! 1. Skip events already recorded as `success` or `ignored`
//! 2. Dispatch to the handler for the event type
//! 3. Record the outcome (success, ignored, or failed)
//!
//! A `failed` record does not block redelivery: Stripe retries after a 5xx
//! and the retry overwrites the failed row. Concurrent duplicates are settled
//! by the primary key on `event_id`; the loser gets `AlreadyProcessed`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::ports::{
    SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookOutcome, WebhookResult,
};

use super::{StripeEvent, StripeEventType, WebhookError};

/// Handler for one or more Stripe event types.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    /// Returns the event type(s) this handler processes.
    fn handles(&self) -> Vec<StripeEventType>;

    /// Handles the webhook event.
    ///
    /// `Err(WebhookError::Ignored(_))` acknowledges without side effects.
    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError>;
}

/// Routes events to their handler.
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    /// Find a handler for the given event type.
    fn get_handler(&self, event_type: &StripeEventType) -> Option<&dyn WebhookEventHandler>;

    /// Dispatch an event to its handler; unknown types are ignored.
    async fn dispatch(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let event_type = event.parsed_type();
        match self.get_handler(&event_type) {
            Some(handler) => handler.handle(event).await,
            None => Err(WebhookError::Ignored(format!(
                "No handler for event type: {}",
                event.event_type
            ))),
        }
    }
}

/// Processes webhook events with idempotency guarantees.
pub struct IdempotentWebhookProcessor<D: WebhookDispatcher> {
    repository: Arc<dyn WebhookEventRepository>,
    dispatcher: D,
    require_livemode: bool,
}

impl<D: WebhookDispatcher> IdempotentWebhookProcessor<D> {
    pub fn new(repository: Arc<dyn WebhookEventRepository>, dispatcher: D) -> Self {
        Self {
            repository,
            dispatcher,
            require_livemode: false,
        }
    }

    /// When set, test-mode events are acknowledged and ignored.
    pub fn with_require_livemode(mut self, require_livemode: bool) -> Self {
        self.require_livemode = require_livemode;
        self
    }

    /// Process a webhook event at most once.
    ///
    /// - `Ok(Processed)`: handled or ignored, outcome recorded
    /// - `Ok(AlreadyProcessed)`: seen before, no side effects
    /// - `Err(_)`: handler failed; recorded as failed, caller answers 5xx/4xx
    pub async fn process(&self, event: StripeEvent) -> Result<WebhookResult, WebhookError> {
        if let Some(existing) = self.repository.find_by_event_id(&event.id).await? {
            if existing.outcome != WebhookOutcome::Failed {
                tracing::debug!(event_id = %event.id, "Webhook event already processed");
                return Ok(WebhookResult::AlreadyProcessed);
            }
        }

        let result = if self.require_livemode && !event.livemode {
            Err(WebhookError::Ignored("test mode event".to_string()))
        } else {
            self.dispatcher.dispatch(&event).await
        };

        let payload = serde_json::to_value(&event)
            .map_err(|e| WebhookError::ParseError(format!("Failed to serialize event: {}", e)))?;
        let record = match &result {
            Ok(()) => WebhookEventRecord::success(&event.id, &event.event_type, payload),
            Err(WebhookError::Ignored(reason)) => {
                tracing::info!(event_id = %event.id, event_type = %event.event_type, reason = %reason, "Webhook event ignored");
                WebhookEventRecord::ignored(&event.id, &event.event_type, reason, payload)
            }
            Err(e) => {
                tracing::warn!(event_id = %event.id, event_type = %event.event_type, error = %e, "Webhook event failed");
                WebhookEventRecord::failed(&event.id, &event.event_type, e.to_string(), payload)
            }
        };

        match self.repository.save(record).await? {
            SaveResult::Inserted => match result {
                Ok(()) | Err(WebhookError::Ignored(_)) => Ok(WebhookResult::Processed),
                Err(e) => Err(e),
            },
            SaveResult::AlreadyExists => Ok(WebhookResult::AlreadyProcessed),
        }
    }
}
