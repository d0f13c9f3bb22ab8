//! HTTP adapter for the catalog: locations, gyms and class types.
//!
//! Members browse active rows under `/api/{locations,gyms,class-types}`.
//! Admins manage every row under `/api/admin/{locations,gyms,class-types}`.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{admin_catalog_routes, catalog_routes};
