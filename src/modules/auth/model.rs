use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::users::model::{User, UserRole};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// Echo of the resolved identity, for client session bootstrap. Clients may
/// cache this for display but it is never accepted back as authorization
/// input.
#[derive(Debug, Serialize, ToSchema)]
pub struct WhoAmI {
    pub user_id: Uuid,
    pub school_id: Option<Uuid>,
    pub role: UserRole,
    pub email: String,
}

/// Failure envelope, documented once and referenced by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
