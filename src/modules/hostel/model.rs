use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::status::RequestStatus;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct HostelAllocation {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub hostel_name: String,
    pub room_number: String,
    pub is_active: bool,
    pub allocated_at: DateTime<Utc>,
    pub released_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAllocationDto {
    pub student_id: Uuid,
    #[validate(length(min = 1))]
    pub hostel_name: String,
    #[validate(length(min = 1))]
    pub room_number: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct HostelOutpass {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub reason: String,
    pub leave_at: DateTime<Utc>,
    pub return_by: DateTime<Utc>,
    pub status: RequestStatus,
    pub decided_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOutpassDto {
    #[validate(length(min = 1))]
    pub reason: String,
    pub leave_at: DateTime<Utc>,
    pub return_by: DateTime<Utc>,
}
