//! Routers for catalog endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{
    admin_list_class_types, admin_list_gyms, admin_list_locations, create_class_type, create_gym,
    create_location, delete_class_type, delete_gym, delete_location, get_class_type, get_gym,
    get_location, list_class_types, list_gyms, list_locations, update_class_type, update_gym,
    update_location,
};
use crate::adapters::http::state::AppState;

/// Member routes, mounted at `/api`.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations))
        .route("/locations/:id", get(get_location))
        .route("/gyms", get(list_gyms))
        .route("/gyms/:id", get(get_gym))
        .route("/class-types", get(list_class_types))
        .route("/class-types/:id", get(get_class_type))
}

/// Admin routes, mounted at `/api/admin`.
pub fn admin_catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/locations", get(admin_list_locations).post(create_location))
        .route("/locations/:id", put(update_location).delete(delete_location))
        .route("/gyms", get(admin_list_gyms).post(create_gym))
        .route("/gyms/:id", put(update_gym).delete(delete_gym))
        .route("/class-types", get(admin_list_class_types).post(create_class_type))
        .route("/class-types/:id", put(update_class_type).delete(delete_class_type))
}
