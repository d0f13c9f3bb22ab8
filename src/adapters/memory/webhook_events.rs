//! In-memory webhook event store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::{SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookOutcome};

/// Keyed on event id, with the same overwrite-failed rule as the
/// Postgres table.
#[derive(Debug, Default)]
pub struct InMemoryWebhookEventRepository {
    records: RwLock<HashMap<String, WebhookEventRecord>>,
}

impl InMemoryWebhookEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl WebhookEventRepository for InMemoryWebhookEventRepository {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError> {
        Ok(self.records.read().await.get(event_id).cloned())
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
        let mut records = self.records.write().await;
        match records.get(&record.event_id) {
            Some(existing) if existing.outcome != WebhookOutcome::Failed => {
                Ok(SaveResult::AlreadyExists)
            }
            _ => {
                records.insert(record.event_id.clone(), record);
                Ok(SaveResult::Inserted)
            }
        }
    }

    async fn delete_before(&self, timestamp: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| record.processed_at >= timestamp);
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[tokio::test]
    async fn failed_records_are_overwritten() {
        let repo = InMemoryWebhookEventRepository::new();
        let first = repo
            .save(WebhookEventRecord::failed("evt_1", "invoice.paid", "db down", json!({})))
            .await
            .unwrap();
        assert_eq!(first, SaveResult::Inserted);

        let retry = repo
            .save(WebhookEventRecord::success("evt_1", "invoice.paid", json!({})))
            .await
            .unwrap();
        assert_eq!(retry, SaveResult::Inserted);

        let stored = repo.find_by_event_id("evt_1").await.unwrap().unwrap();
        assert_eq!(stored.outcome, WebhookOutcome::Success);
    }

    #[tokio::test]
    async fn successful_records_win() {
        let repo = InMemoryWebhookEventRepository::new();
        repo.save(WebhookEventRecord::success("evt_1", "invoice.paid", json!({})))
            .await
            .unwrap();

        let duplicate = repo
            .save(WebhookEventRecord::failed("evt_1", "invoice.paid", "late", json!({})))
            .await
            .unwrap();
        assert_eq!(duplicate, SaveResult::AlreadyExists);
    }

    #[tokio::test]
    async fn delete_before_drops_old_records() {
        let repo = InMemoryWebhookEventRepository::new();
        let mut old = WebhookEventRecord::success("evt_old", "invoice.paid", json!({}));
        old.processed_at = Utc::now() - Duration::days(40);
        repo.save(old).await.unwrap();
        repo.save(WebhookEventRecord::success("evt_new", "invoice.paid", json!({})))
            .await
            .unwrap();

        let purged = repo
            .delete_before(Utc::now() - Duration::days(30))
            .await
            .unwrap();

        assert_eq!(purged, 1);
        assert_eq!(repo.len().await, 1);
        assert!(repo.find_by_event_id("evt_new").await.unwrap().is_some());
    }
}
