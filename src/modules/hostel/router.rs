use axum::{
    Router,
    routing::post,
};

use crate::modules::hostel::controller::{
    approve_outpass, cancel_outpass, create_allocation, create_outpass, list_allocations,
    list_outpasses, reject_outpass, release_allocation,
};
use crate::state::AppState;

pub fn init_hostel_router() -> Router<AppState> {
    Router::new()
        .route("/allocations", post(create_allocation).get(list_allocations))
        .route("/allocations/{id}/release", post(release_allocation))
        .route("/outpasses", post(create_outpass).get(list_outpasses))
        .route("/outpasses/{id}/approve", post(approve_outpass))
        .route("/outpasses/{id}/reject", post(reject_outpass))
        .route("/outpasses/{id}/cancel", post(cancel_outpass))
}
