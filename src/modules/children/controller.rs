//! Parent portal: everything here is gated by the parent-email ownership
//! predicate, evaluated inside the students queries.

use axum::extract::{Path, State};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{TenantContext, TenantScope};
use crate::modules::auth::model::ErrorResponse;
use crate::modules::hostel::model::HostelOutpass;
use crate::modules::hostel::service::HostelService;
use crate::modules::leaves::model::LeaveRequest;
use crate::modules::leaves::service::LeaveService;
use crate::modules::students::model::Student;
use crate::modules::students::service::StudentService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::envelope::ApiResponse;
use crate::utils::errors::AppError;

fn require_parent(ctx: &TenantContext) -> Result<(), AppError> {
    if ctx.role != UserRole::Parent {
        return Err(AppError::forbidden("Parent access required"));
    }
    Ok(())
}

async fn owned_child(
    state: &AppState,
    ctx: &TenantContext,
    scope: &TenantScope,
    student_id: Uuid,
) -> Result<Student, AppError> {
    StudentService::find_child(&state.db, scope, student_id, &ctx.email)
        .await?
        .ok_or_else(|| AppError::not_found("Student not found"))
}

#[utoipa::path(
    get,
    path = "/api/children",
    responses(
        (status = 200, description = "Caller's children", body = [Student]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Parents only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Children"
)]
#[instrument(skip(state))]
pub async fn list_children(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<ApiResponse<Vec<Student>>, AppError> {
    require_parent(&ctx)?;
    let scope = ctx.tenant()?;

    let children = StudentService::list_children(&state.db, &scope, &ctx.email).await?;
    Ok(ApiResponse::success(children))
}

#[utoipa::path(
    get,
    path = "/api/children/{student_id}/leaves",
    params(("student_id" = Uuid, Path, description = "Child's student ID")),
    responses(
        (status = 200, description = "Leave history for the child", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Parents only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Children"
)]
#[instrument(skip(state))]
pub async fn child_leave_history(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(student_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<LeaveRequest>>, AppError> {
    require_parent(&ctx)?;
    let scope = ctx.tenant()?;

    let child = owned_child(&state, &ctx, &scope, student_id).await?;
    let leaves = LeaveService::list_leaves_for_student(&state.db, &scope, child.id).await?;
    Ok(ApiResponse::success(leaves))
}

#[utoipa::path(
    get,
    path = "/api/children/{student_id}/outpasses",
    params(("student_id" = Uuid, Path, description = "Child's student ID")),
    responses(
        (status = 200, description = "Outpass history for the child", body = [HostelOutpass]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Parents only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Children"
)]
#[instrument(skip(state))]
pub async fn child_outpass_history(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(student_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<HostelOutpass>>, AppError> {
    require_parent(&ctx)?;
    let scope = ctx.tenant()?;

    let child = owned_child(&state, &ctx, &scope, student_id).await?;
    let outpasses = HostelService::list_outpasses_for_student(&state.db, &scope, child.id).await?;
    Ok(ApiResponse::success(outpasses))
}
