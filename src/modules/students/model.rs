use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::classes::model::ClassRef;
use crate::utils::pagination::PaginationMeta;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub school_id: Uuid,
    /// Linked login account, when the student has one.
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub class_name: String,
    pub section: String,
    /// Populated class reference; most records only carry the strings.
    pub class_id: Option<Uuid>,
    /// Canonical parent linkage used by the parent portal.
    pub parent_email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn class_ref(&self) -> ClassRef {
        ClassRef::from_parts(self.class_id, &self.class_name, &self.section)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub class_name: String,
    #[validate(length(min = 1))]
    pub section: String,
    pub class_id: Option<Uuid>,
    #[validate(email)]
    pub parent_email: Option<String>,
    /// When set together with `email`, a student login account is created.
    #[validate(length(min = 8))]
    pub login_password: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    #[validate(length(min = 1))]
    pub class_name: Option<String>,
    #[validate(length(min = 1))]
    pub section: Option<String>,
    pub class_id: Option<Uuid>,
    #[validate(email)]
    pub parent_email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}
