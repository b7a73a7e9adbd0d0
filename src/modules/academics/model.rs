use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TimetableEntry {
    pub id: Uuid,
    pub school_id: Uuid,
    pub class_id: Uuid,
    pub day_of_week: i16,
    pub period: i16,
    pub subject: String,
    pub teacher_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTimetableEntryDto {
    pub class_id: Uuid,
    #[validate(range(min = 1, max = 7))]
    pub day_of_week: i16,
    #[validate(range(min = 1, max = 12))]
    pub period: i16,
    #[validate(length(min = 1))]
    pub subject: String,
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudyMaterial {
    pub id: Uuid,
    pub school_id: Uuid,
    pub class_id: Uuid,
    pub title: String,
    pub subject: String,
    /// Stored path produced by the upload layer; accepted as given.
    pub file_path: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudyMaterialDto {
    pub class_id: Uuid,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub file_path: String,
}
