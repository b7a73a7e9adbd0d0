use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::TenantScope;
use crate::modules::hostel::model::{
    CreateAllocationDto, CreateOutpassDto, HostelAllocation, HostelOutpass,
};
use crate::modules::students::service::StudentService;
use crate::utils::errors::AppError;
use crate::utils::status::{RequestStatus, blocked_transition};

const ALLOCATION_COLUMNS: &str =
    "id, school_id, student_id, hostel_name, room_number, is_active, allocated_at, released_at";
const OUTPASS_COLUMNS: &str = "id, school_id, student_id, reason, leave_at, return_by, status, \
     decided_by, created_at, updated_at";

pub struct HostelService;

impl HostelService {
    #[instrument(skip(db, dto))]
    pub async fn create_allocation(
        db: &PgPool,
        scope: &TenantScope,
        dto: CreateAllocationDto,
    ) -> Result<HostelAllocation, AppError> {
        // The student must exist within the tenant before a bed is assigned.
        StudentService::get_student_by_id(db, scope, dto.student_id).await?;

        let allocation = sqlx::query_as::<_, HostelAllocation>(&format!(
            r#"
            INSERT INTO hostel_allocations (school_id, student_id, hostel_name, room_number)
            VALUES ($1, $2, $3, $4)
            RETURNING {ALLOCATION_COLUMNS}
            "#
        ))
        .bind(scope.school_id())
        .bind(dto.student_id)
        .bind(&dto.hostel_name)
        .bind(&dto.room_number)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::database(e, "Student already has an active hostel allocation"))?;

        Ok(allocation)
    }

    #[instrument(skip(db))]
    pub async fn list_allocations(
        db: &PgPool,
        scope: &TenantScope,
    ) -> Result<Vec<HostelAllocation>, AppError> {
        let allocations = sqlx::query_as::<_, HostelAllocation>(&format!(
            r#"
            SELECT {ALLOCATION_COLUMNS}
            FROM hostel_allocations
            WHERE school_id = $1
            ORDER BY allocated_at DESC
            "#
        ))
        .bind(scope.school_id())
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(allocations)
    }

    #[instrument(skip(db))]
    pub async fn list_allocations_for_student(
        db: &PgPool,
        scope: &TenantScope,
        student_id: Uuid,
    ) -> Result<Vec<HostelAllocation>, AppError> {
        let allocations = sqlx::query_as::<_, HostelAllocation>(&format!(
            r#"
            SELECT {ALLOCATION_COLUMNS}
            FROM hostel_allocations
            WHERE school_id = $1 AND student_id = $2
            ORDER BY allocated_at DESC
            "#
        ))
        .bind(scope.school_id())
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(allocations)
    }

    /// Release is a status flip, not a deletion; releasing twice conflicts.
    #[instrument(skip(db))]
    pub async fn release_allocation(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<HostelAllocation, AppError> {
        let released = sqlx::query_as::<_, HostelAllocation>(&format!(
            r#"
            UPDATE hostel_allocations
            SET is_active = FALSE, released_at = NOW()
            WHERE id = $1 AND school_id = $2 AND is_active
            RETURNING {ALLOCATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(scope.school_id())
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        match released {
            Some(allocation) => Ok(allocation),
            None => {
                let exists = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM hostel_allocations WHERE id = $1 AND school_id = $2",
                )
                .bind(id)
                .bind(scope.school_id())
                .fetch_one(db)
                .await
                .map_err(AppError::internal)?;

                if exists > 0 {
                    Err(AppError::conflict("Allocation has already been released"))
                } else {
                    Err(AppError::not_found("Allocation not found"))
                }
            }
        }
    }

    #[instrument(skip(db, dto))]
    pub async fn create_outpass(
        db: &PgPool,
        scope: &TenantScope,
        student_id: Uuid,
        dto: CreateOutpassDto,
    ) -> Result<HostelOutpass, AppError> {
        if dto.return_by <= dto.leave_at {
            return Err(AppError::bad_request("Return time must be after leave time"));
        }

        let outpass = sqlx::query_as::<_, HostelOutpass>(&format!(
            r#"
            INSERT INTO hostel_outpasses (school_id, student_id, reason, leave_at, return_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {OUTPASS_COLUMNS}
            "#
        ))
        .bind(scope.school_id())
        .bind(student_id)
        .bind(&dto.reason)
        .bind(dto.leave_at)
        .bind(dto.return_by)
        .fetch_one(db)
        .await
        .map_err(AppError::internal)?;

        Ok(outpass)
    }

    #[instrument(skip(db))]
    pub async fn list_outpasses(
        db: &PgPool,
        scope: &TenantScope,
    ) -> Result<Vec<HostelOutpass>, AppError> {
        let outpasses = sqlx::query_as::<_, HostelOutpass>(&format!(
            r#"
            SELECT {OUTPASS_COLUMNS}
            FROM hostel_outpasses
            WHERE school_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(scope.school_id())
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(outpasses)
    }

    #[instrument(skip(db))]
    pub async fn list_outpasses_for_student(
        db: &PgPool,
        scope: &TenantScope,
        student_id: Uuid,
    ) -> Result<Vec<HostelOutpass>, AppError> {
        let outpasses = sqlx::query_as::<_, HostelOutpass>(&format!(
            r#"
            SELECT {OUTPASS_COLUMNS}
            FROM hostel_outpasses
            WHERE school_id = $1 AND student_id = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(scope.school_id())
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(outpasses)
    }

    async fn current_status(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Option<RequestStatus>, AppError> {
        sqlx::query_scalar::<_, RequestStatus>(
            "SELECT status FROM hostel_outpasses WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(scope.school_id())
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)
    }

    #[instrument(skip(db))]
    pub async fn decide_outpass(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
        decided_by: Uuid,
        approve: bool,
    ) -> Result<HostelOutpass, AppError> {
        let new_status = if approve {
            RequestStatus::Approved
        } else {
            RequestStatus::Rejected
        };

        let decided = sqlx::query_as::<_, HostelOutpass>(&format!(
            r#"
            UPDATE hostel_outpasses
            SET status = $1, decided_by = $2, updated_at = NOW()
            WHERE id = $3 AND school_id = $4 AND status = 'pending'
            RETURNING {OUTPASS_COLUMNS}
            "#
        ))
        .bind(new_status)
        .bind(decided_by)
        .bind(id)
        .bind(scope.school_id())
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        match decided {
            Some(outpass) => Ok(outpass),
            None => {
                let current = Self::current_status(db, scope, id).await?;
                Err(blocked_transition(current, "Outpass"))
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn cancel_outpass(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
        student_id: Uuid,
    ) -> Result<HostelOutpass, AppError> {
        let cancelled = sqlx::query_as::<_, HostelOutpass>(&format!(
            r#"
            UPDATE hostel_outpasses
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND school_id = $2 AND student_id = $3 AND status = 'pending'
            RETURNING {OUTPASS_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(scope.school_id())
        .bind(student_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        match cancelled {
            Some(outpass) => Ok(outpass),
            None => {
                let current = sqlx::query_scalar::<_, RequestStatus>(
                    r#"
                    SELECT status FROM hostel_outpasses
                    WHERE id = $1 AND school_id = $2 AND student_id = $3
                    "#,
                )
                .bind(id)
                .bind(scope.school_id())
                .bind(student_id)
                .fetch_optional(db)
                .await
                .map_err(AppError::internal)?;
                Err(blocked_transition(current, "Outpass"))
            }
        }
    }
}
