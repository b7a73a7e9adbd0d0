use axum::{Router, routing::get};

use crate::modules::children::controller::{
    child_leave_history, child_outpass_history, list_children,
};
use crate::state::AppState;

pub fn init_children_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_children))
        .route("/{student_id}/leaves", get(child_leave_history))
        .route("/{student_id}/outpasses", get(child_outpass_history))
}
