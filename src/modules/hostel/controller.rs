use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::{TenantContext, TenantScope};
use crate::modules::auth::model::ErrorResponse;
use crate::modules::hostel::model::{
    CreateAllocationDto, CreateOutpassDto, HostelAllocation, HostelOutpass,
};
use crate::modules::hostel::service::HostelService;
use crate::modules::students::model::Student;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::envelope::ApiResponse;
use crate::utils::errors::AppError;

async fn own_student_record(
    state: &AppState,
    ctx: &TenantContext,
    scope: &TenantScope,
) -> Result<Student, AppError> {
    StudentService::find_by_user(&state.db, scope, ctx.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("No student record is linked to this account"))
}

#[utoipa::path(
    post,
    path = "/api/hostel/allocations",
    request_body = CreateAllocationDto,
    responses(
        (status = 201, description = "Allocation created", body = HostelAllocation),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Student already allocated", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Hostel"
)]
#[instrument(skip(state, dto))]
pub async fn create_allocation(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(dto): Json<CreateAllocationDto>,
) -> Result<ApiResponse<HostelAllocation>, AppError> {
    ctx.require_admin()?;
    dto.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {}", e)))?;

    let scope = ctx.tenant()?;
    let allocation = HostelService::create_allocation(&state.db, &scope, dto).await?;
    Ok(ApiResponse::created(allocation))
}

#[utoipa::path(
    get,
    path = "/api/hostel/allocations",
    responses(
        (status = 200, description = "Staff: all allocations; students: own", body = [HostelAllocation]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Hostel"
)]
#[instrument(skip(state))]
pub async fn list_allocations(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<ApiResponse<Vec<HostelAllocation>>, AppError> {
    let scope = ctx.tenant()?;

    let allocations = if ctx.role.is_staff() {
        HostelService::list_allocations(&state.db, &scope).await?
    } else {
        let student = own_student_record(&state, &ctx, &scope).await?;
        HostelService::list_allocations_for_student(&state.db, &scope, student.id).await?
    };

    Ok(ApiResponse::success(allocations))
}

#[utoipa::path(
    post,
    path = "/api/hostel/allocations/{id}/release",
    params(("id" = Uuid, Path, description = "Allocation ID")),
    responses(
        (status = 200, description = "Allocation released", body = HostelAllocation),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 404, description = "Allocation not found", body = ErrorResponse),
        (status = 409, description = "Already released", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Hostel"
)]
#[instrument(skip(state))]
pub async fn release_allocation(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<HostelAllocation>, AppError> {
    ctx.require_admin()?;
    let scope = ctx.tenant()?;

    let allocation = HostelService::release_allocation(&state.db, &scope, id).await?;
    Ok(ApiResponse::success(allocation))
}

#[utoipa::path(
    post,
    path = "/api/hostel/outpasses",
    request_body = CreateOutpassDto,
    responses(
        (status = 201, description = "Outpass created as pending", body = HostelOutpass),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Hostel"
)]
#[instrument(skip(state, dto))]
pub async fn create_outpass(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(dto): Json<CreateOutpassDto>,
) -> Result<ApiResponse<HostelOutpass>, AppError> {
    dto.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {}", e)))?;

    let scope = ctx.tenant()?;
    let student = own_student_record(&state, &ctx, &scope).await?;

    let outpass = HostelService::create_outpass(&state.db, &scope, student.id, dto).await?;
    Ok(ApiResponse::created(outpass))
}

#[utoipa::path(
    get,
    path = "/api/hostel/outpasses",
    responses(
        (status = 200, description = "Staff: all outpasses; students: own", body = [HostelOutpass]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Hostel"
)]
#[instrument(skip(state))]
pub async fn list_outpasses(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<ApiResponse<Vec<HostelOutpass>>, AppError> {
    let scope = ctx.tenant()?;

    let outpasses = if ctx.role.is_staff() {
        HostelService::list_outpasses(&state.db, &scope).await?
    } else {
        let student = own_student_record(&state, &ctx, &scope).await?;
        HostelService::list_outpasses_for_student(&state.db, &scope, student.id).await?
    };

    Ok(ApiResponse::success(outpasses))
}

#[utoipa::path(
    post,
    path = "/api/hostel/outpasses/{id}/approve",
    params(("id" = Uuid, Path, description = "Outpass ID")),
    responses(
        (status = 200, description = "Approved", body = HostelOutpass),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Outpass not found", body = ErrorResponse),
        (status = 409, description = "Already decided", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Hostel"
)]
#[instrument(skip(state))]
pub async fn approve_outpass(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<HostelOutpass>, AppError> {
    ctx.require_staff()?;
    let scope = ctx.tenant()?;

    let outpass = HostelService::decide_outpass(&state.db, &scope, id, ctx.user_id, true).await?;
    Ok(ApiResponse::success(outpass))
}

#[utoipa::path(
    post,
    path = "/api/hostel/outpasses/{id}/reject",
    params(("id" = Uuid, Path, description = "Outpass ID")),
    responses(
        (status = 200, description = "Rejected", body = HostelOutpass),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Outpass not found", body = ErrorResponse),
        (status = 409, description = "Already decided", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Hostel"
)]
#[instrument(skip(state))]
pub async fn reject_outpass(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<HostelOutpass>, AppError> {
    ctx.require_staff()?;
    let scope = ctx.tenant()?;

    let outpass = HostelService::decide_outpass(&state.db, &scope, id, ctx.user_id, false).await?;
    Ok(ApiResponse::success(outpass))
}

#[utoipa::path(
    post,
    path = "/api/hostel/outpasses/{id}/cancel",
    params(("id" = Uuid, Path, description = "Outpass ID")),
    responses(
        (status = 200, description = "Cancelled", body = HostelOutpass),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Owner only", body = ErrorResponse),
        (status = 404, description = "Outpass not found", body = ErrorResponse),
        (status = 409, description = "Already decided", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Hostel"
)]
#[instrument(skip(state))]
pub async fn cancel_outpass(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<HostelOutpass>, AppError> {
    let scope = ctx.tenant()?;
    let student = own_student_record(&state, &ctx, &scope).await?;

    let outpass = HostelService::cancel_outpass(&state.db, &scope, id, student.id).await?;
    Ok(ApiResponse::success(outpass))
}
