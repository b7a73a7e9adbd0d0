use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::modules::users::model::UserRole;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Trusted identity for the current request.
///
/// Built by verifying the bearer token and then re-loading the user row, so
/// role, tenant and activation state always reflect the database — never the
/// token payload and never anything the client sent in body or query.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub user_id: Uuid,
    pub school_id: Option<Uuid>,
    pub role: UserRole,
    pub email: String,
}

impl TenantContext {
    /// The tenant this request is allowed to touch. Super admins have no
    /// school of their own and cannot use school-scoped endpoints.
    pub fn tenant(&self) -> Result<TenantScope, AppError> {
        let school_id = self
            .school_id
            .ok_or_else(|| AppError::forbidden("Account is not assigned to a school"))?;
        Ok(TenantScope { school_id })
    }

    pub fn require_staff(&self) -> Result<(), AppError> {
        if !self.role.is_staff() {
            return Err(AppError::forbidden("Staff access required"));
        }
        Ok(())
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if !self.role.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }
        Ok(())
    }
}

/// Proof that a tenant id came out of a resolved [`TenantContext`].
///
/// The field is private on purpose: services take `&TenantScope` for every
/// tenant-scoped query, and the only way to obtain one is
/// [`TenantContext::tenant`]. A handler cannot accidentally scope a query by
/// a client-supplied school id.
#[derive(Debug, Clone, Copy)]
pub struct TenantScope {
    school_id: Uuid,
}

impl TenantScope {
    pub fn school_id(&self) -> Uuid {
        self.school_id
    }
}

impl FromRequestParts<AppState> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Role-gate middleware may already have resolved the context.
        if let Some(ctx) = parts.extensions.get::<TenantContext>() {
            return Ok(ctx.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))?;

        let user = UserService::get_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Unknown user"))?;

        if !user.is_active {
            return Err(AppError::unauthorized("Account is deactivated"));
        }

        Ok(TenantContext {
            user_id: user.id,
            school_id: user.school_id,
            role: user.role,
            email: user.email,
        })
    }
}
