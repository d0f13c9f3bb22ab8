//! Catalog handlers for locations, gyms and class types.
//!
//! Admins create, update and delete; members get and list active rows.

mod class_types;
mod gyms;
mod locations;

pub use class_types::{
    CreateClassTypeHandler, DeleteClassTypeHandler, GetClassTypeHandler, GetClassTypeQuery,
    ListClassTypesHandler, UpdateClassTypeCommand, UpdateClassTypeHandler,
};
pub use gyms::{
    CreateGymHandler, DeleteGymHandler, GetGymHandler, GetGymQuery, ListGymsHandler,
    ListGymsQuery, UpdateGymCommand, UpdateGymHandler,
};
pub use locations::{
    CreateLocationHandler, DeleteLocationHandler, GetLocationHandler, GetLocationQuery,
    ListLocationsHandler, UpdateLocationCommand, UpdateLocationHandler,
};
