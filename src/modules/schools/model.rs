use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::users::model::User;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Provisions a tenant together with its first school admin account.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSchoolDto {
    #[validate(length(min = 1))]
    pub name: String,
    pub address: Option<String>,
    #[validate(length(min = 1))]
    pub admin_first_name: String,
    #[validate(length(min = 1))]
    pub admin_last_name: String,
    #[validate(email)]
    pub admin_email: String,
    #[validate(length(min = 8))]
    pub admin_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolWithAdmin {
    pub school: School,
    pub admin: User,
}
