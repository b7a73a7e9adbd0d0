use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::status::RequestStatus;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// The account that filed the request: the student, or a parent.
    pub requested_by: Uuid,
    pub status: RequestStatus,
    pub decided_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLeaveRequestDto {
    /// Required when a parent files on behalf of a child; ignored for
    /// student callers, whose own record is always used.
    pub student_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
