//! PostgreSQL implementations of the catalog repositories.
//!
//! `gyms.location_id` is `ON DELETE RESTRICT`, so deleting a location that
//! still has gyms surfaces as a foreign-key `Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::catalog::{ClassType, Gym, Location};
use crate::domain::foundation::{ClassTypeId, DomainError, GymId, LocationId, Timestamp};
use crate::ports::{ClassTypeRepository, GymRepository, LocationRepository};

use super::error::db_error;

// ════════════════════════════════════════════════════════════════════════════
// Locations
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresLocationRepository {
    pool: PgPool,
}

impl PostgresLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id: Uuid,
    name: String,
    address: String,
    city: String,
    phone: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            id: LocationId::from_uuid(row.id),
            name: row.name,
            address: row.address,
            city: row.city,
            phone: row.phone,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn create(&self, location: &Location) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO locations (id, name, address, city, phone, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(location.id.as_uuid())
        .bind(&location.name)
        .bind(&location.address)
        .bind(&location.city)
        .bind(&location.phone)
        .bind(location.is_active)
        .bind(location.created_at.as_datetime())
        .bind(location.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("create location", e))?;
        Ok(())
    }

    async fn update(&self, location: &Location) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE locations SET
                name = $2, address = $3, city = $4, phone = $5, is_active = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(location.id.as_uuid())
        .bind(&location.name)
        .bind(&location.address)
        .bind(&location.city)
        .bind(&location.phone)
        .bind(location.is_active)
        .bind(location.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update location", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Location", location.id));
        }
        Ok(())
    }

    async fn delete(&self, id: &LocationId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete location", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Location", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, DomainError> {
        let row: Option<LocationRow> = sqlx::query_as(
            r#"
            SELECT id, name, address, city, phone, is_active, created_at, updated_at
            FROM locations WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find location", e))?;

        Ok(row.map(Location::from))
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Location>, DomainError> {
        let rows: Vec<LocationRow> = sqlx::query_as(
            r#"
            SELECT id, name, address, city, phone, is_active, created_at, updated_at
            FROM locations
            WHERE $1 OR is_active
            ORDER BY name ASC
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list locations", e))?;

        Ok(rows.into_iter().map(Location::from).collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gyms
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresGymRepository {
    pool: PgPool,
}

impl PostgresGymRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GymRow {
    id: Uuid,
    location_id: Uuid,
    name: String,
    description: Option<String>,
    capacity: Option<i32>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GymRow> for Gym {
    fn from(row: GymRow) -> Self {
        Gym {
            id: GymId::from_uuid(row.id),
            location_id: LocationId::from_uuid(row.location_id),
            name: row.name,
            description: row.description,
            capacity: row.capacity,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

#[async_trait]
impl GymRepository for PostgresGymRepository {
    async fn create(&self, gym: &Gym) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO gyms (
                id, location_id, name, description, capacity, is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(gym.id.as_uuid())
        .bind(gym.location_id.as_uuid())
        .bind(&gym.name)
        .bind(&gym.description)
        .bind(gym.capacity)
        .bind(gym.is_active)
        .bind(gym.created_at.as_datetime())
        .bind(gym.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("create gym", e))?;
        Ok(())
    }

    async fn update(&self, gym: &Gym) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE gyms SET
                location_id = $2, name = $3, description = $4, capacity = $5,
                is_active = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(gym.id.as_uuid())
        .bind(gym.location_id.as_uuid())
        .bind(&gym.name)
        .bind(&gym.description)
        .bind(gym.capacity)
        .bind(gym.is_active)
        .bind(gym.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update gym", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Gym", gym.id));
        }
        Ok(())
    }

    async fn delete(&self, id: &GymId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM gyms WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete gym", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Gym", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &GymId) -> Result<Option<Gym>, DomainError> {
        let row: Option<GymRow> = sqlx::query_as(
            r#"
            SELECT id, location_id, name, description, capacity, is_active, created_at, updated_at
            FROM gyms WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find gym", e))?;

        Ok(row.map(Gym::from))
    }

    async fn list(
        &self,
        location_id: Option<&LocationId>,
        include_inactive: bool,
    ) -> Result<Vec<Gym>, DomainError> {
        let rows: Vec<GymRow> = sqlx::query_as(
            r#"
            SELECT id, location_id, name, description, capacity, is_active, created_at, updated_at
            FROM gyms
            WHERE ($1::uuid IS NULL OR location_id = $1)
              AND ($2 OR is_active)
            ORDER BY name ASC
            "#,
        )
        .bind(location_id.map(|id| *id.as_uuid()))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list gyms", e))?;

        Ok(rows.into_iter().map(Gym::from).collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Class types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresClassTypeRepository {
    pool: PgPool,
}

impl PostgresClassTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClassTypeRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    duration_minutes: i32,
    color: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClassTypeRow> for ClassType {
    fn from(row: ClassTypeRow) -> Self {
        ClassType {
            id: ClassTypeId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            duration_minutes: row.duration_minutes,
            color: row.color,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

#[async_trait]
impl ClassTypeRepository for PostgresClassTypeRepository {
    async fn create(&self, class_type: &ClassType) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO class_types (
                id, name, description, duration_minutes, color, is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(class_type.id.as_uuid())
        .bind(&class_type.name)
        .bind(&class_type.description)
        .bind(class_type.duration_minutes)
        .bind(&class_type.color)
        .bind(class_type.is_active)
        .bind(class_type.created_at.as_datetime())
        .bind(class_type.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("create class type", e))?;
        Ok(())
    }

    async fn update(&self, class_type: &ClassType) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE class_types SET
                name = $2, description = $3, duration_minutes = $4, color = $5,
                is_active = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(class_type.id.as_uuid())
        .bind(&class_type.name)
        .bind(&class_type.description)
        .bind(class_type.duration_minutes)
        .bind(&class_type.color)
        .bind(class_type.is_active)
        .bind(class_type.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update class type", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("ClassType", class_type.id));
        }
        Ok(())
    }

    async fn delete(&self, id: &ClassTypeId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM class_types WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete class type", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("ClassType", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ClassTypeId) -> Result<Option<ClassType>, DomainError> {
        let row: Option<ClassTypeRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, duration_minutes, color, is_active, created_at, updated_at
            FROM class_types WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find class type", e))?;

        Ok(row.map(ClassType::from))
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<ClassType>, DomainError> {
        let rows: Vec<ClassTypeRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, duration_minutes, color, is_active, created_at, updated_at
            FROM class_types
            WHERE $1 OR is_active
            ORDER BY name ASC
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list class types", e))?;

        Ok(rows.into_iter().map(ClassType::from).collect())
    }
}
