use axum::{Json, extract::State};
use tracing::instrument;
use validator::Validate;

use crate::middleware::auth::TenantContext;
use crate::modules::auth::model::{ErrorResponse, LoginRequest, LoginResponse, WhoAmI};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::utils::envelope::ApiResponse;
use crate::utils::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    dto.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {}", e)))?;

    let response = AuthService::login(&state.db, &state.jwt_config, dto).await?;
    Ok(ApiResponse::success(response))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Resolved identity", body = WhoAmI),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
#[instrument(skip_all)]
pub async fn me(ctx: TenantContext) -> Result<ApiResponse<WhoAmI>, AppError> {
    Ok(ApiResponse::success(WhoAmI {
        user_id: ctx.user_id,
        school_id: ctx.school_id,
        role: ctx.role,
        email: ctx.email,
    }))
}
