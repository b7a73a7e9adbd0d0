use axum::{Json, extract::State};
use tracing::instrument;
use validator::Validate;

use crate::modules::auth::model::ErrorResponse;
use crate::modules::schools::model::{CreateSchoolDto, School, SchoolWithAdmin};
use crate::modules::schools::service::SchoolService;
use crate::state::AppState;
use crate::utils::envelope::ApiResponse;
use crate::utils::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/schools",
    request_body = CreateSchoolDto,
    responses(
        (status = 201, description = "School created", body = SchoolWithAdmin),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Super admin only", body = ErrorResponse),
        (status = 409, description = "Duplicate school or admin email", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Schools"
)]
#[instrument(skip(state, dto))]
pub async fn create_school(
    State(state): State<AppState>,
    Json(dto): Json<CreateSchoolDto>,
) -> Result<ApiResponse<SchoolWithAdmin>, AppError> {
    dto.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {}", e)))?;

    let created = SchoolService::create_school(&state.db, dto).await?;
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    get,
    path = "/api/schools",
    responses(
        (status = 200, description = "All schools", body = [School]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Super admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Schools"
)]
#[instrument(skip(state))]
pub async fn list_schools(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<School>>, AppError> {
    let schools = SchoolService::list_schools(&state.db).await?;
    Ok(ApiResponse::success(schools))
}
