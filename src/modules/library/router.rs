use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::library::controller::{
    approve_book_request, cancel_book_request, create_book_request, list_book_requests,
    list_issue_records, reject_book_request, return_issue,
};
use crate::state::AppState;

pub fn init_library_router() -> Router<AppState> {
    Router::new()
        .route("/requests", post(create_book_request).get(list_book_requests))
        .route("/requests/{id}/approve", post(approve_book_request))
        .route("/requests/{id}/reject", post(reject_book_request))
        .route("/requests/{id}/cancel", post(cancel_book_request))
        .route("/issues", get(list_issue_records))
        .route("/issues/{id}/return", post(return_issue))
}
