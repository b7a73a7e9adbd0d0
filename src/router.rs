use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::{require_admin, require_staff, require_super_admin};
use crate::modules::academics::router::{
    init_materials_router, init_portal_router, init_timetable_router,
};
use crate::modules::auth::router::init_auth_router;
use crate::modules::children::router::init_children_router;
use crate::modules::classes::router::init_classes_router;
use crate::modules::hostel::router::init_hostel_router;
use crate::modules::leaves::router::init_leaves_router;
use crate::modules::library::router::init_library_router;
use crate::modules::schools::router::init_schools_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest(
                    "/schools",
                    init_schools_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_super_admin,
                    )),
                )
                .nest(
                    "/students",
                    init_students_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest(
                    "/classes",
                    init_classes_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest(
                    "/timetable",
                    init_timetable_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff)),
                )
                .nest(
                    "/materials",
                    init_materials_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff)),
                )
                .nest("/portal", init_portal_router())
                .nest("/library", init_library_router())
                .nest("/hostel", init_hostel_router())
                .nest("/leaves", init_leaves_router())
                .nest("/children", init_children_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
