use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::TenantContext;
use crate::modules::academics::model::{
    CreateStudyMaterialDto, CreateTimetableEntryDto, StudyMaterial, TimetableEntry,
};
use crate::modules::academics::service::AcademicsService;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::utils::envelope::ApiResponse;
use crate::utils::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/timetable",
    request_body = CreateTimetableEntryDto,
    responses(
        (status = 201, description = "Timetable entry created", body = TimetableEntry),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 409, description = "Slot already scheduled", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academics"
)]
#[instrument(skip(state, dto))]
pub async fn create_timetable_entry(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(dto): Json<CreateTimetableEntryDto>,
) -> Result<ApiResponse<TimetableEntry>, AppError> {
    dto.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {}", e)))?;

    let scope = ctx.tenant()?;
    let entry = AcademicsService::create_timetable_entry(&state.db, &scope, dto).await?;
    Ok(ApiResponse::created(entry))
}

#[utoipa::path(
    get,
    path = "/api/timetable/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Timetable for the class", body = [TimetableEntry]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academics"
)]
#[instrument(skip(state))]
pub async fn get_class_timetable(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(class_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<TimetableEntry>>, AppError> {
    let scope = ctx.tenant()?;
    let entries = AcademicsService::list_timetable_for_class(&state.db, &scope, class_id).await?;
    Ok(ApiResponse::success(entries))
}

#[utoipa::path(
    post,
    path = "/api/materials",
    request_body = CreateStudyMaterialDto,
    responses(
        (status = 201, description = "Study material registered", body = StudyMaterial),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academics"
)]
#[instrument(skip(state, dto))]
pub async fn create_material(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(dto): Json<CreateStudyMaterialDto>,
) -> Result<ApiResponse<StudyMaterial>, AppError> {
    dto.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {}", e)))?;

    let scope = ctx.tenant()?;
    let material = AcademicsService::create_material(&state.db, &scope, ctx.user_id, dto).await?;
    Ok(ApiResponse::created(material))
}

#[utoipa::path(
    get,
    path = "/api/materials/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Materials for the class", body = [StudyMaterial]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academics"
)]
#[instrument(skip(state))]
pub async fn get_class_materials(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(class_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<StudyMaterial>>, AppError> {
    let scope = ctx.tenant()?;
    let materials = AcademicsService::list_materials_for_class(&state.db, &scope, class_id).await?;
    Ok(ApiResponse::success(materials))
}

#[utoipa::path(
    get,
    path = "/api/portal/timetable",
    responses(
        (status = 200, description = "Caller's timetable; empty when no class maps", body = [TimetableEntry]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Portal"
)]
#[instrument(skip(state))]
pub async fn portal_timetable(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<ApiResponse<Vec<TimetableEntry>>, AppError> {
    let scope = ctx.tenant()?;
    let entries = AcademicsService::portal_timetable(&state.db, &scope, ctx.user_id).await?;
    Ok(ApiResponse::success(entries))
}

#[utoipa::path(
    get,
    path = "/api/portal/materials",
    responses(
        (status = 200, description = "Caller's study materials; empty when no class maps", body = [StudyMaterial]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Portal"
)]
#[instrument(skip(state))]
pub async fn portal_materials(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<ApiResponse<Vec<StudyMaterial>>, AppError> {
    let scope = ctx.tenant()?;
    let materials = AcademicsService::portal_materials(&state.db, &scope, ctx.user_id).await?;
    Ok(ApiResponse::success(materials))
}
