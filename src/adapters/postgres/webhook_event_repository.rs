//! PostgreSQL implementation of WebhookEventRepository.
//!
//! `event_id` is the primary key. A row whose `result` is `failed` is
//! replaced by the next attempt; any other existing row makes the insert a
//! no-op, which settles concurrent duplicate deliveries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::ports::{SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookOutcome};

use super::error::{db_error, parse_column};

#[derive(Clone)]
pub struct PostgresWebhookEventRepository {
    pool: PgPool,
}

impl PostgresWebhookEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WebhookEventRow {
    event_id: String,
    event_type: String,
    result: String,
    error_message: Option<String>,
    payload: serde_json::Value,
    processed_at: DateTime<Utc>,
}

impl TryFrom<WebhookEventRow> for WebhookEventRecord {
    type Error = DomainError;

    fn try_from(row: WebhookEventRow) -> Result<Self, Self::Error> {
        Ok(WebhookEventRecord {
            event_id: row.event_id,
            event_type: row.event_type,
            processed_at: row.processed_at,
            outcome: parse_column::<WebhookOutcome>("result", &row.result)?,
            error_message: row.error_message,
            payload: row.payload,
        })
    }
}

#[async_trait]
impl WebhookEventRepository for PostgresWebhookEventRepository {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError> {
        let row: Option<WebhookEventRow> = sqlx::query_as(
            r#"
            SELECT event_id, event_type, result, error_message, payload, processed_at
            FROM stripe_webhook_events
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find webhook event", e))?;

        row.map(WebhookEventRecord::try_from).transpose()
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO stripe_webhook_events (
                event_id, event_type, result, error_message, payload, processed_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (event_id) DO UPDATE SET
                result = EXCLUDED.result,
                error_message = EXCLUDED.error_message,
                payload = EXCLUDED.payload,
                processed_at = EXCLUDED.processed_at
            WHERE stripe_webhook_events.result = 'failed'
            "#,
        )
        .bind(&record.event_id)
        .bind(&record.event_type)
        .bind(record.outcome.as_str())
        .bind(&record.error_message)
        .bind(&record.payload)
        .bind(record.processed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save webhook event", e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(event_id = %record.event_id, "Webhook event already recorded");
            return Ok(SaveResult::AlreadyExists);
        }
        Ok(SaveResult::Inserted)
    }

    async fn delete_before(&self, timestamp: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM stripe_webhook_events WHERE processed_at < $1")
            .bind(timestamp)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("purge webhook events", e))?;

        Ok(result.rows_affected())
    }
}
