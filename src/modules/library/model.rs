use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::status::RequestStatus;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookRequest {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub status: RequestStatus,
    pub decided_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequestDto {
    #[validate(length(min = 1))]
    pub title: String,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct IssueRecord {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub request_id: Uuid,
    pub book_title: String,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}
