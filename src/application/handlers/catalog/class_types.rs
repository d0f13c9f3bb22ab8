//! Class type handlers - admin CRUD plus member reads.
//!
//! Names are unique case-insensitively; the repository reports duplicates as
//! `Conflict`.

use std::sync::Arc;

use crate::domain::catalog::{ClassType, ClassTypeInput};
use crate::domain::foundation::{ClassTypeId, DomainError};
use crate::ports::ClassTypeRepository;

#[derive(Debug, Clone)]
pub struct UpdateClassTypeCommand {
    pub id: ClassTypeId,
    pub input: ClassTypeInput,
}

#[derive(Debug, Clone, Copy)]
pub struct GetClassTypeQuery {
    pub id: ClassTypeId,
    pub include_inactive: bool,
}

pub struct CreateClassTypeHandler {
    class_types: Arc<dyn ClassTypeRepository>,
}

impl CreateClassTypeHandler {
    pub fn new(class_types: Arc<dyn ClassTypeRepository>) -> Self {
        Self { class_types }
    }

    pub async fn handle(&self, input: ClassTypeInput) -> Result<ClassType, DomainError> {
        let class_type = ClassType::create(input)?;
        self.class_types.create(&class_type).await?;
        tracing::info!(class_type_id = %class_type.id, name = %class_type.name, "Class type created");
        Ok(class_type)
    }
}

pub struct UpdateClassTypeHandler {
    class_types: Arc<dyn ClassTypeRepository>,
}

impl UpdateClassTypeHandler {
    pub fn new(class_types: Arc<dyn ClassTypeRepository>) -> Self {
        Self { class_types }
    }

    pub async fn handle(&self, cmd: UpdateClassTypeCommand) -> Result<ClassType, DomainError> {
        let mut class_type = self
            .class_types
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| DomainError::not_found("class_type", cmd.id))?;

        class_type.update(cmd.input)?;
        self.class_types.update(&class_type).await?;
        Ok(class_type)
    }
}

pub struct DeleteClassTypeHandler {
    class_types: Arc<dyn ClassTypeRepository>,
}

impl DeleteClassTypeHandler {
    pub fn new(class_types: Arc<dyn ClassTypeRepository>) -> Self {
        Self { class_types }
    }

    pub async fn handle(&self, id: ClassTypeId) -> Result<(), DomainError> {
        self.class_types.delete(&id).await?;
        tracing::info!(class_type_id = %id, "Class type deleted");
        Ok(())
    }
}

pub struct GetClassTypeHandler {
    class_types: Arc<dyn ClassTypeRepository>,
}

impl GetClassTypeHandler {
    pub fn new(class_types: Arc<dyn ClassTypeRepository>) -> Self {
        Self { class_types }
    }

    pub async fn handle(&self, query: GetClassTypeQuery) -> Result<ClassType, DomainError> {
        self.class_types
            .find_by_id(&query.id)
            .await?
            .filter(|c| query.include_inactive || c.is_active)
            .ok_or_else(|| DomainError::not_found("class_type", query.id))
    }
}

pub struct ListClassTypesHandler {
    class_types: Arc<dyn ClassTypeRepository>,
}

impl ListClassTypesHandler {
    pub fn new(class_types: Arc<dyn ClassTypeRepository>) -> Self {
        Self { class_types }
    }

    pub async fn handle(&self, include_inactive: bool) -> Result<Vec<ClassType>, DomainError> {
        self.class_types.list(include_inactive).await
    }
}
