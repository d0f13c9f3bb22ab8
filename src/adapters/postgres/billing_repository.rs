//! PostgreSQL implementations of the billing repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{
    BillingInterval, MembershipPlan, PaymentRecord, PaymentStatus, Subscription,
    SubscriptionStatus,
};
use crate::domain::foundation::{
    DomainError, PaymentId, PlanId, ProfileId, SubscriptionId, Timestamp,
};
use crate::ports::{PaymentHistoryRepository, PlanRepository, SubscriptionRepository};

use super::error::{db_error, parse_column};

fn ts(value: Option<DateTime<Utc>>) -> Option<Timestamp> {
    value.map(Timestamp::from_datetime)
}

fn dt(value: Option<Timestamp>) -> Option<DateTime<Utc>> {
    value.map(DateTime::<Utc>::from)
}

// ════════════════════════════════════════════════════════════════════════════
// Plans
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    price_cents: i64,
    currency: String,
    billing_interval: String,
    stripe_price_id: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for MembershipPlan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(MembershipPlan {
            id: PlanId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            currency: row.currency,
            billing_interval: parse_column::<BillingInterval>(
                "billing_interval",
                &row.billing_interval,
            )?,
            stripe_price_id: row.stripe_price_id,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_PLAN: &str = r#"
    SELECT id, name, description, price_cents, currency, billing_interval,
           stripe_price_id, is_active, created_at, updated_at
    FROM membership_plans
"#;

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn create(&self, plan: &MembershipPlan) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO membership_plans (
                id, name, description, price_cents, currency, billing_interval,
                stripe_price_id, is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.price_cents)
        .bind(&plan.currency)
        .bind(plan.billing_interval.as_str())
        .bind(&plan.stripe_price_id)
        .bind(plan.is_active)
        .bind(plan.created_at.as_datetime())
        .bind(plan.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("create plan", e))?;
        Ok(())
    }

    async fn update(&self, plan: &MembershipPlan) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE membership_plans SET
                name = $2, description = $3, price_cents = $4, currency = $5,
                billing_interval = $6, stripe_price_id = $7, is_active = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.price_cents)
        .bind(&plan.currency)
        .bind(plan.billing_interval.as_str())
        .bind(&plan.stripe_price_id)
        .bind(plan.is_active)
        .bind(plan.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update plan", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("MembershipPlan", plan.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<MembershipPlan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_PLAN))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find plan", e))?;

        row.map(MembershipPlan::try_from).transpose()
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<MembershipPlan>, DomainError> {
        let rows: Vec<PlanRow> = sqlx::query_as(&format!(
            "{} WHERE $1 OR is_active ORDER BY price_cents ASC",
            SELECT_PLAN
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list plans", e))?;

        rows.into_iter().map(MembershipPlan::try_from).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Subscriptions
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    profile_id: Uuid,
    plan_id: Uuid,
    status: String,
    stripe_customer_id: String,
    stripe_subscription_id: String,
    current_period_start: Option<DateTime<Utc>>,
    current_period_end: Option<DateTime<Utc>>,
    cancel_at_period_end: bool,
    canceled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            profile_id: ProfileId::from_uuid(row.profile_id),
            plan_id: PlanId::from_uuid(row.plan_id),
            status: parse_column::<SubscriptionStatus>("status", &row.status)?,
            stripe_customer_id: row.stripe_customer_id,
            stripe_subscription_id: row.stripe_subscription_id,
            current_period_start: ts(row.current_period_start),
            current_period_end: ts(row.current_period_end),
            cancel_at_period_end: row.cancel_at_period_end,
            canceled_at: ts(row.canceled_at),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_SUBSCRIPTION: &str = r#"
    SELECT id, profile_id, plan_id, status, stripe_customer_id, stripe_subscription_id,
           current_period_start, current_period_end, cancel_at_period_end, canceled_at,
           created_at, updated_at
    FROM subscriptions
"#;

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, profile_id, plan_id, status, stripe_customer_id, stripe_subscription_id,
                current_period_start, current_period_end, cancel_at_period_end, canceled_at,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                plan_id = EXCLUDED.plan_id,
                status = EXCLUDED.status,
                current_period_start = EXCLUDED.current_period_start,
                current_period_end = EXCLUDED.current_period_end,
                cancel_at_period_end = EXCLUDED.cancel_at_period_end,
                canceled_at = EXCLUDED.canceled_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.profile_id.as_uuid())
        .bind(subscription.plan_id.as_uuid())
        .bind(subscription.status.as_str())
        .bind(&subscription.stripe_customer_id)
        .bind(&subscription.stripe_subscription_id)
        .bind(dt(subscription.current_period_start))
        .bind(dt(subscription.current_period_end))
        .bind(subscription.cancel_at_period_end)
        .bind(dt(subscription.canceled_at))
        .bind(subscription.created_at.as_datetime())
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save subscription", e))?;
        Ok(())
    }

    async fn find_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE stripe_subscription_id = $1",
            SELECT_SUBSCRIPTION
        ))
        .bind(stripe_subscription_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_latest_for_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE profile_id = $1 ORDER BY created_at DESC LIMIT 1",
            SELECT_SUBSCRIPTION
        ))
        .bind(profile_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find subscription for profile", e))?;

        row.map(Subscription::try_from).transpose()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Payment history
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresPaymentHistoryRepository {
    pool: PgPool,
}

impl PostgresPaymentHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    profile_id: Uuid,
    subscription_id: Option<Uuid>,
    stripe_invoice_id: String,
    amount_cents: i64,
    currency: String,
    status: String,
    attempt_count: i32,
    next_retry_at: Option<DateTime<Utc>>,
    failure_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for PaymentRecord {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(PaymentRecord {
            id: PaymentId::from_uuid(row.id),
            profile_id: ProfileId::from_uuid(row.profile_id),
            subscription_id: row.subscription_id.map(SubscriptionId::from_uuid),
            stripe_invoice_id: row.stripe_invoice_id,
            amount_cents: row.amount_cents,
            currency: row.currency,
            status: parse_column::<PaymentStatus>("status", &row.status)?,
            attempt_count: row.attempt_count,
            next_retry_at: ts(row.next_retry_at),
            failure_message: row.failure_message,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_PAYMENT: &str = r#"
    SELECT id, profile_id, subscription_id, stripe_invoice_id, amount_cents, currency,
           status, attempt_count, next_retry_at, failure_message, created_at, updated_at
    FROM payment_history
"#;

#[async_trait]
impl PaymentHistoryRepository for PostgresPaymentHistoryRepository {
    async fn save(&self, payment: &PaymentRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payment_history (
                id, profile_id, subscription_id, stripe_invoice_id, amount_cents, currency,
                status, attempt_count, next_retry_at, failure_message, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (stripe_invoice_id) DO UPDATE SET
                subscription_id = COALESCE(EXCLUDED.subscription_id, payment_history.subscription_id),
                amount_cents = EXCLUDED.amount_cents,
                status = EXCLUDED.status,
                attempt_count = EXCLUDED.attempt_count,
                next_retry_at = EXCLUDED.next_retry_at,
                failure_message = EXCLUDED.failure_message,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.profile_id.as_uuid())
        .bind(payment.subscription_id.map(|id| *id.as_uuid()))
        .bind(&payment.stripe_invoice_id)
        .bind(payment.amount_cents)
        .bind(&payment.currency)
        .bind(payment.status.as_str())
        .bind(payment.attempt_count)
        .bind(dt(payment.next_retry_at))
        .bind(&payment.failure_message)
        .bind(payment.created_at.as_datetime())
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save payment", e))?;
        Ok(())
    }

    async fn find_by_invoice_id(
        &self,
        stripe_invoice_id: &str,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        let row: Option<PaymentRow> =
            sqlx::query_as(&format!("{} WHERE stripe_invoice_id = $1", SELECT_PAYMENT))
                .bind(stripe_invoice_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find payment", e))?;

        row.map(PaymentRecord::try_from).transpose()
    }

    async fn list_for_profile(
        &self,
        profile_id: &ProfileId,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "{} WHERE profile_id = $1 ORDER BY created_at DESC LIMIT $2",
            SELECT_PAYMENT
        ))
        .bind(profile_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list payments", e))?;

        rows.into_iter().map(PaymentRecord::try_from).collect()
    }

    async fn list_due_for_retry(
        &self,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "{} WHERE status = 'failed' AND next_retry_at <= $1 ORDER BY next_retry_at ASC LIMIT $2",
            SELECT_PAYMENT
        ))
        .bind(now.as_datetime())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list payments due for retry", e))?;

        rows.into_iter().map(PaymentRecord::try_from).collect()
    }
}
