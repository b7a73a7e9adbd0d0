use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::academics::controller::{
    create_material, create_timetable_entry, get_class_materials, get_class_timetable,
    portal_materials, portal_timetable,
};
use crate::state::AppState;

pub fn init_timetable_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_timetable_entry))
        .route("/{class_id}", get(get_class_timetable))
}

pub fn init_materials_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_material))
        .route("/{class_id}", get(get_class_materials))
}

pub fn init_portal_router() -> Router<AppState> {
    Router::new()
        .route("/timetable", get(portal_timetable))
        .route("/materials", get(portal_materials))
}
