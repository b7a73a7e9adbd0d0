use axum::{Router, routing::post};

use crate::modules::classes::controller::{create_class, list_classes};
use crate::state::AppState;

pub fn init_classes_router() -> Router<AppState> {
    Router::new().route("/", post(create_class).get(list_classes))
}
