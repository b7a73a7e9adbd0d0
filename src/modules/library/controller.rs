use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::{TenantContext, TenantScope};
use crate::modules::auth::model::ErrorResponse;
use crate::modules::library::model::{BookRequest, CreateBookRequestDto, IssueRecord};
use crate::modules::library::service::LibraryService;
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
    path = "/api/library/requests",
    request_body = CreateBookRequestDto,
    responses(
        (status = 201, description = "Book request created as pending", body = BookRequest),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state, dto))]
pub async fn create_book_request(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(dto): Json<CreateBookRequestDto>,
) -> Result<ApiResponse<BookRequest>, AppError> {
    dto.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {}", e)))?;

    let scope = ctx.tenant()?;
    let student = own_student_record(&state, &ctx, &scope).await?;

    let request = LibraryService::create_request(&state.db, &scope, student.id, dto).await?;
    Ok(ApiResponse::created(request))
}

#[utoipa::path(
    get,
    path = "/api/library/requests",
    responses(
        (status = 200, description = "Staff: all requests in the school; students: own", body = [BookRequest]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state))]
pub async fn list_book_requests(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<ApiResponse<Vec<BookRequest>>, AppError> {
    let scope = ctx.tenant()?;

    let requests = if ctx.role.is_staff() {
        LibraryService::list_requests(&state.db, &scope).await?
    } else {
        let student = own_student_record(&state, &ctx, &scope).await?;
        LibraryService::list_requests_for_student(&state.db, &scope, student.id).await?
    };

    Ok(ApiResponse::success(requests))
}

#[utoipa::path(
    post,
    path = "/api/library/requests/{id}/approve",
    params(("id" = Uuid, Path, description = "Book request ID")),
    responses(
        (status = 200, description = "Approved; issue record created", body = IssueRecord),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 409, description = "Request already decided", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state))]
pub async fn approve_book_request(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<IssueRecord>, AppError> {
    ctx.require_staff()?;
    let scope = ctx.tenant()?;

    let issue = LibraryService::approve_request(&state.db, &scope, id, ctx.user_id).await?;
    Ok(ApiResponse::success(issue))
}

#[utoipa::path(
    post,
    path = "/api/library/requests/{id}/reject",
    params(("id" = Uuid, Path, description = "Book request ID")),
    responses(
        (status = 200, description = "Rejected", body = BookRequest),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 409, description = "Request already decided", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state))]
pub async fn reject_book_request(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<BookRequest>, AppError> {
    ctx.require_staff()?;
    let scope = ctx.tenant()?;

    let request = LibraryService::reject_request(&state.db, &scope, id, ctx.user_id).await?;
    Ok(ApiResponse::success(request))
}

#[utoipa::path(
    post,
    path = "/api/library/requests/{id}/cancel",
    params(("id" = Uuid, Path, description = "Book request ID")),
    responses(
        (status = 200, description = "Cancelled", body = BookRequest),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Owner only", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 409, description = "Request already decided", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state))]
pub async fn cancel_book_request(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<BookRequest>, AppError> {
    let scope = ctx.tenant()?;
    let student = own_student_record(&state, &ctx, &scope).await?;

    let request = LibraryService::cancel_request(&state.db, &scope, id, student.id).await?;
    Ok(ApiResponse::success(request))
}

#[utoipa::path(
    get,
    path = "/api/library/issues",
    responses(
        (status = 200, description = "Staff: all issue records; students: own", body = [IssueRecord]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state))]
pub async fn list_issue_records(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<ApiResponse<Vec<IssueRecord>>, AppError> {
    let scope = ctx.tenant()?;

    let issues = if ctx.role.is_staff() {
        LibraryService::list_issues(&state.db, &scope).await?
    } else {
        let student = own_student_record(&state, &ctx, &scope).await?;
        LibraryService::list_issues_for_student(&state.db, &scope, student.id).await?
    };

    Ok(ApiResponse::success(issues))
}

#[utoipa::path(
    post,
    path = "/api/library/issues/{id}/return",
    params(("id" = Uuid, Path, description = "Issue record ID")),
    responses(
        (status = 200, description = "Book returned", body = IssueRecord),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Issue record not found", body = ErrorResponse),
        (status = 409, description = "Already returned", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state))]
pub async fn return_issue(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<IssueRecord>, AppError> {
    ctx.require_staff()?;
    let scope = ctx.tenant()?;

    let issue = LibraryService::return_issue(&state.db, &scope, id).await?;
    Ok(ApiResponse::success(issue))
}
