//! Webhook intake: verify the signature, then process the event once.

use crate::domain::billing::{
    IdempotentWebhookProcessor, StripeWebhookVerifier, WebhookDispatcher, WebhookError,
};
use crate::ports::WebhookResult;

#[derive(Debug, Clone)]
pub struct HandleStripeWebhookCommand {
    /// Raw request body; the signature covers these exact bytes.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: String,
}

pub struct HandleStripeWebhookHandler<D: WebhookDispatcher> {
    verifier: StripeWebhookVerifier,
    processor: IdempotentWebhookProcessor<D>,
}

impl<D: WebhookDispatcher> HandleStripeWebhookHandler<D> {
    pub fn new(verifier: StripeWebhookVerifier, processor: IdempotentWebhookProcessor<D>) -> Self {
        Self {
            verifier,
            processor,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleStripeWebhookCommand,
    ) -> Result<WebhookResult, WebhookError> {
        let event = self.verifier.verify_and_parse(&cmd.payload, &cmd.signature)?;
        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Webhook verified");
        self.processor.process(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWebhookEventRepository;
    use crate::application::handlers::billing::stripe_webhooks::tests::World;
    use crate::application::handlers::billing::StripeWebhookDispatcher;
    use crate::domain::billing::signature_header;
    use crate::adapters::stripe::MockPaymentProvider;
    use secrecy::SecretString;
    use std::sync::Arc;

    const SECRET: &str = "whsec_test_secret";

    fn handler(
        world: &World,
        events: Arc<InMemoryWebhookEventRepository>,
    ) -> HandleStripeWebhookHandler<StripeWebhookDispatcher> {
        HandleStripeWebhookHandler::new(
            StripeWebhookVerifier::new(SecretString::new(SECRET.to_string())),
            IdempotentWebhookProcessor::new(events, world.dispatcher()),
        )
    }

    fn signed(event: &crate::domain::billing::StripeEvent) -> HandleStripeWebhookCommand {
        let payload = serde_json::to_vec(event).unwrap();
        let signature = signature_header(SECRET, chrono::Utc::now().timestamp(), &payload);
        HandleStripeWebhookCommand { payload, signature }
    }

    #[tokio::test]
    async fn signed_checkout_is_processed_once() {
        let world = World::new().await;
        world
            .provider
            .add_subscription(MockPaymentProvider::active_subscription("sub_1", "cus_1"));
        let events = Arc::new(InMemoryWebhookEventRepository::new());
        let handler = handler(&world, events.clone());
        let cmd = signed(&world.checkout_event());

        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert_eq!(first, WebhookResult::Processed);
        assert_eq!(second, WebhookResult::AlreadyProcessed);
        assert_eq!(world.provider.calls_to("get_subscription").len(), 1);
        assert_eq!(events.len().await, 1);
    }

    #[tokio::test]
    async fn tampered_payload_is_rejected_before_processing() {
        let world = World::new().await;
        let events = Arc::new(InMemoryWebhookEventRepository::new());
        let handler = handler(&world, events.clone());
        let mut cmd = signed(&world.checkout_event());
        cmd.payload.extend_from_slice(b" ");

        let err = handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, WebhookError::InvalidSignature));
        assert!(events.is_empty().await);
    }
}
