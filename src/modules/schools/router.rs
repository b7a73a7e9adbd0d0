use axum::{Router, routing::post};

use crate::modules::schools::controller::{create_school, list_schools};
use crate::state::AppState;

pub fn init_schools_router() -> Router<AppState> {
    Router::new().route("/", post(create_school).get(list_schools))
}
