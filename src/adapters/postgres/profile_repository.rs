//! PostgreSQL implementation of ProfileRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ProfileId, Timestamp};
use crate::domain::profile::{Profile, Role};
use crate::ports::ProfileRepository;

use super::error::{db_error, parse_column};

#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    email: String,
    full_name: Option<String>,
    phone: Option<String>,
    role: String,
    stripe_customer_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = DomainError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: ProfileId::from_uuid(row.id),
            email: row.email,
            full_name: row.full_name,
            phone: row.phone,
            role: parse_column::<Role>("role", &row.role)?,
            stripe_customer_id: row.stripe_customer_id,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_PROFILE: &str = r#"
    SELECT id, email, full_name, phone, role, stripe_customer_id, created_at, updated_at
    FROM profiles
"#;

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn create(&self, profile: &Profile) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, email, full_name, phone, role, stripe_customer_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(&profile.phone)
        .bind(profile.role.as_str())
        .bind(&profile.stripe_customer_id)
        .bind(profile.created_at.as_datetime())
        .bind(profile.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("create profile", e))?;

        Ok(())
    }

    async fn update(&self, profile: &Profile) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                full_name = $2,
                phone = $3,
                role = $4,
                stripe_customer_id = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(&profile.full_name)
        .bind(&profile.phone)
        .bind(profile.role.as_str())
        .bind(&profile.stripe_customer_id)
        .bind(profile.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update profile", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Profile", profile.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, DomainError> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_PROFILE))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find profile", e))?;

        row.map(Profile::try_from).transpose()
    }

    async fn find_by_stripe_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<Profile>, DomainError> {
        let row: Option<ProfileRow> =
            sqlx::query_as(&format!("{} WHERE stripe_customer_id = $1", SELECT_PROFILE))
                .bind(customer_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find profile by customer", e))?;

        row.map(Profile::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Profile>, DomainError> {
        let rows: Vec<ProfileRow> =
            sqlx::query_as(&format!("{} ORDER BY created_at ASC", SELECT_PROFILE))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("list profiles", e))?;

        rows.into_iter().map(Profile::try_from).collect()
    }
}
