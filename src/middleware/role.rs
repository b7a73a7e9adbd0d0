//! Role-gate middleware applied per route group with
//! `middleware::from_fn_with_state`. The resolved context is stashed in the
//! request extensions so handlers do not resolve it twice.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};

use crate::middleware::auth::TenantContext;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

async fn gate(
    state: AppState,
    req: Request,
    next: Next,
    check: fn(UserRole) -> bool,
    denial: &str,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let ctx = TenantContext::from_request_parts(&mut parts, &state).await?;

    if !check(ctx.role) {
        return Err(AppError::forbidden(denial));
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

pub async fn require_super_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(
        state,
        req,
        next,
        |role| matches!(role, UserRole::SuperAdmin),
        "Super admin access required",
    )
    .await
}

pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(
        state,
        req,
        next,
        |role| role.is_admin(),
        "Admin access required",
    )
    .await
}

pub async fn require_staff(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(
        state,
        req,
        next,
        |role| role.is_staff(),
        "Staff access required",
    )
    .await
}
