use axum::{Json, extract::State};
use tracing::instrument;
use validator::Validate;

use crate::middleware::auth::TenantContext;
use crate::modules::auth::model::ErrorResponse;
use crate::modules::classes::model::{Class, CreateClassDto};
use crate::modules::classes::service::ClassService;
use crate::state::AppState;
use crate::utils::envelope::ApiResponse;
use crate::utils::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 409, description = "Class already exists", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(dto): Json<CreateClassDto>,
) -> Result<ApiResponse<Class>, AppError> {
    dto.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {}", e)))?;

    let scope = ctx.tenant()?;
    let class = ClassService::create_class(&state.db, &scope, dto).await?;
    Ok(ApiResponse::created(class))
}

#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "Classes in the school", body = [Class]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn list_classes(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<ApiResponse<Vec<Class>>, AppError> {
    let scope = ctx.tenant()?;
    let classes = ClassService::list_classes(&state.db, &scope).await?;
    Ok(ApiResponse::success(classes))
}
