use axum::{Router, routing::post};

use crate::modules::leaves::controller::{
    approve_leave_request, cancel_leave_request, create_leave_request, list_leave_requests,
    reject_leave_request,
};
use crate::state::AppState;

pub fn init_leaves_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_leave_request).get(list_leave_requests))
        .route("/{id}/approve", post(approve_leave_request))
        .route("/{id}/reject", post(reject_leave_request))
        .route("/{id}/cancel", post(cancel_leave_request))
}
