use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::TenantContext;
use crate::modules::auth::model::ErrorResponse;
use crate::modules::leaves::model::{CreateLeaveRequestDto, LeaveRequest};
use crate::modules::leaves::service::LeaveService;
use crate::modules::students::service::StudentService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::envelope::ApiResponse;
use crate::utils::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = CreateLeaveRequestDto,
    responses(
        (status = 201, description = "Leave request created as pending", body = LeaveRequest),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Students and parents only", body = ErrorResponse),
        (status = 404, description = "Child not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
#[instrument(skip(state, dto))]
pub async fn create_leave_request(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(dto): Json<CreateLeaveRequestDto>,
) -> Result<ApiResponse<LeaveRequest>, AppError> {
    dto.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {}", e)))?;

    let scope = ctx.tenant()?;

    let student_id = match ctx.role {
        UserRole::Student => {
            StudentService::find_by_user(&state.db, &scope, ctx.user_id)
                .await?
                .ok_or_else(|| {
                    AppError::forbidden("No student record is linked to this account")
                })?
                .id
        }
        UserRole::Parent => {
            let student_id = dto
                .student_id
                .ok_or_else(|| AppError::bad_request("student_id is required for parents"))?;
            // The ownership predicate lives in the query: someone else's
            // child looks exactly like a student that does not exist.
            StudentService::find_child(&state.db, &scope, student_id, &ctx.email)
                .await?
                .ok_or_else(|| AppError::not_found("Student not found"))?
                .id
        }
        _ => {
            return Err(AppError::forbidden(
                "Only students and parents may file leave requests",
            ));
        }
    };

    let leave = LeaveService::create_leave(
        &state.db,
        &scope,
        student_id,
        ctx.user_id,
        &dto.reason,
        dto.start_date,
        dto.end_date,
    )
    .await?;

    Ok(ApiResponse::created(leave))
}

#[utoipa::path(
    get,
    path = "/api/leaves",
    responses(
        (status = 200, description = "Staff: all; students: own; parents: their children's", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
#[instrument(skip(state))]
pub async fn list_leave_requests(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<ApiResponse<Vec<LeaveRequest>>, AppError> {
    let scope = ctx.tenant()?;

    let leaves = match ctx.role {
        role if role.is_staff() => LeaveService::list_leaves(&state.db, &scope).await?,
        UserRole::Student => {
            let student = StudentService::find_by_user(&state.db, &scope, ctx.user_id)
                .await?
                .ok_or_else(|| {
                    AppError::forbidden("No student record is linked to this account")
                })?;
            LeaveService::list_leaves_for_student(&state.db, &scope, student.id).await?
        }
        UserRole::Parent => {
            LeaveService::list_leaves_for_parent(&state.db, &scope, &ctx.email).await?
        }
        _ => return Err(AppError::forbidden("Forbidden")),
    };

    Ok(ApiResponse::success(leaves))
}

#[utoipa::path(
    post,
    path = "/api/leaves/{id}/approve",
    params(("id" = Uuid, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Approved", body = LeaveRequest),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Leave request not found", body = ErrorResponse),
        (status = 409, description = "Already decided", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
#[instrument(skip(state))]
pub async fn approve_leave_request(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<LeaveRequest>, AppError> {
    ctx.require_staff()?;
    let scope = ctx.tenant()?;

    let leave = LeaveService::decide_leave(&state.db, &scope, id, ctx.user_id, true).await?;
    Ok(ApiResponse::success(leave))
}

#[utoipa::path(
    post,
    path = "/api/leaves/{id}/reject",
    params(("id" = Uuid, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Rejected", body = LeaveRequest),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Leave request not found", body = ErrorResponse),
        (status = 409, description = "Already decided", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
#[instrument(skip(state))]
pub async fn reject_leave_request(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<LeaveRequest>, AppError> {
    ctx.require_staff()?;
    let scope = ctx.tenant()?;

    let leave = LeaveService::decide_leave(&state.db, &scope, id, ctx.user_id, false).await?;
    Ok(ApiResponse::success(leave))
}

#[utoipa::path(
    post,
    path = "/api/leaves/{id}/cancel",
    params(("id" = Uuid, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Cancelled", body = LeaveRequest),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Leave request not found", body = ErrorResponse),
        (status = 409, description = "Already decided", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
#[instrument(skip(state))]
pub async fn cancel_leave_request(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<LeaveRequest>, AppError> {
    let scope = ctx.tenant()?;

    let leave = LeaveService::cancel_leave(&state.db, &scope, id, ctx.user_id).await?;
    Ok(ApiResponse::success(leave))
}
