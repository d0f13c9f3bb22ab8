//! In-memory catalog: locations, gyms and class types in one store so the
//! location/gym reference can be enforced like the foreign key does.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::catalog::{ClassType, Gym, Location};
use crate::domain::foundation::{ClassTypeId, DomainError, GymId, LocationId};
use crate::ports::{ClassTypeRepository, GymRepository, LocationRepository};

#[derive(Debug, Default)]
struct Tables {
    locations: HashMap<LocationId, Location>,
    gyms: HashMap<GymId, Gym>,
    class_types: HashMap<ClassTypeId, ClassType>,
}

impl Tables {
    fn check_location_exists(&self, id: &LocationId) -> Result<(), DomainError> {
        if self.locations.contains_key(id) {
            Ok(())
        } else {
            Err(DomainError::conflict("Gym references a missing location")
                .with_detail("location_id", id.to_string()))
        }
    }

    fn check_class_type_name(&self, class_type: &ClassType) -> Result<(), DomainError> {
        let taken = self
            .class_types
            .values()
            .any(|c| c.id != class_type.id && c.name.eq_ignore_ascii_case(&class_type.name));
        if taken {
            return Err(DomainError::conflict(format!(
                "A class type named '{}' already exists",
                class_type.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    tables: RwLock<Tables>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// (active locations, active gyms, active class types)
    pub(crate) async fn active_counts(&self) -> (i64, i64, i64) {
        let tables = self.tables.read().await;
        (
            tables.locations.values().filter(|l| l.is_active).count() as i64,
            tables.gyms.values().filter(|g| g.is_active).count() as i64,
            tables.class_types.values().filter(|c| c.is_active).count() as i64,
        )
    }
}

fn sorted_by_name<T>(mut rows: Vec<T>, name: impl Fn(&T) -> &str) -> Vec<T> {
    rows.sort_by(|a, b| name(a).cmp(name(b)));
    rows
}

#[async_trait]
impl LocationRepository for InMemoryCatalog {
    async fn create(&self, location: &Location) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.locations.contains_key(&location.id) {
            return Err(DomainError::conflict("Location already exists"));
        }
        tables.locations.insert(location.id, location.clone());
        Ok(())
    }

    async fn update(&self, location: &Location) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.locations.get_mut(&location.id) {
            Some(row) => {
                *row = location.clone();
                Ok(())
            }
            None => Err(DomainError::not_found("Location", location.id)),
        }
    }

    async fn delete(&self, id: &LocationId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.gyms.values().any(|g| &g.location_id == id) {
            return Err(DomainError::conflict("Location still has gyms")
                .with_detail("location_id", id.to_string()));
        }
        tables
            .locations
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Location", id))
    }

    async fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, DomainError> {
        Ok(self.tables.read().await.locations.get(id).cloned())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Location>, DomainError> {
        let tables = self.tables.read().await;
        let rows = tables
            .locations
            .values()
            .filter(|l| include_inactive || l.is_active)
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |l: &Location| l.name.as_str()))
    }
}

#[async_trait]
impl GymRepository for InMemoryCatalog {
    async fn create(&self, gym: &Gym) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_location_exists(&gym.location_id)?;
        if tables.gyms.contains_key(&gym.id) {
            return Err(DomainError::conflict("Gym already exists"));
        }
        tables.gyms.insert(gym.id, gym.clone());
        Ok(())
    }

    async fn update(&self, gym: &Gym) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_location_exists(&gym.location_id)?;
        match tables.gyms.get_mut(&gym.id) {
            Some(row) => {
                *row = gym.clone();
                Ok(())
            }
            None => Err(DomainError::not_found("Gym", gym.id)),
        }
    }

    async fn delete(&self, id: &GymId) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .gyms
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Gym", id))
    }

    async fn find_by_id(&self, id: &GymId) -> Result<Option<Gym>, DomainError> {
        Ok(self.tables.read().await.gyms.get(id).cloned())
    }

    async fn list(
        &self,
        location_id: Option<&LocationId>,
        include_inactive: bool,
    ) -> Result<Vec<Gym>, DomainError> {
        let tables = self.tables.read().await;
        let rows = tables
            .gyms
            .values()
            .filter(|g| include_inactive || g.is_active)
            .filter(|g| location_id.map_or(true, |id| &g.location_id == id))
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |g: &Gym| g.name.as_str()))
    }
}

#[async_trait]
impl ClassTypeRepository for InMemoryCatalog {
    async fn create(&self, class_type: &ClassType) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_class_type_name(class_type)?;
        tables.class_types.insert(class_type.id, class_type.clone());
        Ok(())
    }

    async fn update(&self, class_type: &ClassType) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.class_types.contains_key(&class_type.id) {
            return Err(DomainError::not_found("ClassType", class_type.id));
        }
        tables.check_class_type_name(class_type)?;
        tables.class_types.insert(class_type.id, class_type.clone());
        Ok(())
    }

    async fn delete(&self, id: &ClassTypeId) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .class_types
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("ClassType", id))
    }

    async fn find_by_id(&self, id: &ClassTypeId) -> Result<Option<ClassType>, DomainError> {
        Ok(self.tables.read().await.class_types.get(id).cloned())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<ClassType>, DomainError> {
        let tables = self.tables.read().await;
        let rows = tables
            .class_types
            .values()
            .filter(|c| include_inactive || c.is_active)
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |c: &ClassType| c.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{ClassTypeInput, GymInput, LocationInput};
    use crate::domain::foundation::ErrorCode;

    fn location(name: &str, is_active: bool) -> Location {
        Location::create(LocationInput {
            name: name.to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            phone: None,
            is_active,
        })
        .unwrap()
    }

    fn gym(location_id: LocationId, name: &str) -> Gym {
        Gym::create(GymInput {
            location_id,
            name: name.to_string(),
            description: None,
            capacity: Some(30),
            is_active: true,
        })
        .unwrap()
    }

    fn class_type(name: &str) -> ClassType {
        ClassType::create(ClassTypeInput {
            name: name.to_string(),
            description: None,
            duration_minutes: 60,
            color: None,
            is_active: true,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn location_with_gyms_cannot_be_deleted() {
        let catalog = InMemoryCatalog::new();
        let downtown = location("Downtown", true);
        LocationRepository::create(&catalog, &downtown).await.unwrap();
        let mat_room = gym(downtown.id, "Mat Room");
        GymRepository::create(&catalog, &mat_room).await.unwrap();

        let err = LocationRepository::delete(&catalog, &downtown.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        GymRepository::delete(&catalog, &mat_room.id).await.unwrap();
        LocationRepository::delete(&catalog, &downtown.id).await.unwrap();
    }

    #[tokio::test]
    async fn gym_requires_existing_location() {
        let catalog = InMemoryCatalog::new();
        let err = GymRepository::create(&catalog, &gym(LocationId::new(), "Orphan"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn list_hides_inactive_rows_unless_asked() {
        let catalog = InMemoryCatalog::new();
        LocationRepository::create(&catalog, &location("Uptown", true)).await.unwrap();
        LocationRepository::create(&catalog, &location("Closed", false)).await.unwrap();

        let active = LocationRepository::list(&catalog, false).await.unwrap();
        assert_eq!(active.len(), 1);
        let all = LocationRepository::list(&catalog, true).await.unwrap();
        assert_eq!(
            all.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
            vec!["Closed", "Uptown"]
        );
    }

    #[tokio::test]
    async fn class_type_names_are_unique() {
        let catalog = InMemoryCatalog::new();
        ClassTypeRepository::create(&catalog, &class_type("BJJ Fundamentals"))
            .await
            .unwrap();

        let err = ClassTypeRepository::create(&catalog, &class_type("bjj fundamentals"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn gyms_filter_by_location() {
        let catalog = InMemoryCatalog::new();
        let a = location("A", true);
        let b = location("B", true);
        LocationRepository::create(&catalog, &a).await.unwrap();
        LocationRepository::create(&catalog, &b).await.unwrap();
        GymRepository::create(&catalog, &gym(a.id, "A1")).await.unwrap();
        GymRepository::create(&catalog, &gym(b.id, "B1")).await.unwrap();

        let gyms = GymRepository::list(&catalog, Some(&a.id), false).await.unwrap();
        assert_eq!(gyms.len(), 1);
        assert_eq!(gyms[0].name, "A1");
        assert_eq!(catalog.active_counts().await, (2, 2, 0));
    }
}
