use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::TenantScope;
use crate::modules::leaves::model::LeaveRequest;
use crate::utils::errors::AppError;
use crate::utils::status::{RequestStatus, blocked_transition};

const LEAVE_COLUMNS: &str = "id, school_id, student_id, reason, start_date, end_date, \
     requested_by, status, decided_by, created_at, updated_at";

pub struct LeaveService;

impl LeaveService {
    #[instrument(skip(db, reason))]
    pub async fn create_leave(
        db: &PgPool,
        scope: &TenantScope,
        student_id: Uuid,
        requested_by: Uuid,
        reason: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<LeaveRequest, AppError> {
        if end_date < start_date {
            return Err(AppError::bad_request("End date must not precede start date"));
        }

        let leave = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            INSERT INTO leave_requests
                (school_id, student_id, reason, start_date, end_date, requested_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(scope.school_id())
        .bind(student_id)
        .bind(reason)
        .bind(start_date)
        .bind(end_date)
        .bind(requested_by)
        .fetch_one(db)
        .await
        .map_err(AppError::internal)?;

        Ok(leave)
    }

    #[instrument(skip(db))]
    pub async fn list_leaves(
        db: &PgPool,
        scope: &TenantScope,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leave_requests
            WHERE school_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(scope.school_id())
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(leaves)
    }

    #[instrument(skip(db))]
    pub async fn list_leaves_for_student(
        db: &PgPool,
        scope: &TenantScope,
        student_id: Uuid,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leave_requests
            WHERE school_id = $1 AND student_id = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(scope.school_id())
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(leaves)
    }

    /// All leaves across the caller's children; the parent-email predicate
    /// rides on the join so nothing outside the family is reachable.
    #[instrument(skip(db))]
    pub async fn list_leaves_for_parent(
        db: &PgPool,
        scope: &TenantScope,
        parent_email: &str,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT lr.id, lr.school_id, lr.student_id, lr.reason, lr.start_date, lr.end_date,
                   lr.requested_by, lr.status, lr.decided_by, lr.created_at, lr.updated_at
            FROM leave_requests lr
            JOIN students s ON s.id = lr.student_id AND s.school_id = lr.school_id
            WHERE lr.school_id = $1 AND s.parent_email = $2
            ORDER BY lr.created_at DESC
            "#,
        )
        .bind(scope.school_id())
        .bind(parent_email)
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(leaves)
    }

    async fn current_status(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Option<RequestStatus>, AppError> {
        sqlx::query_scalar::<_, RequestStatus>(
            "SELECT status FROM leave_requests WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(scope.school_id())
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)
    }

    #[instrument(skip(db))]
    pub async fn decide_leave(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
        decided_by: Uuid,
        approve: bool,
    ) -> Result<LeaveRequest, AppError> {
        let new_status = if approve {
            RequestStatus::Approved
        } else {
            RequestStatus::Rejected
        };

        let decided = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            UPDATE leave_requests
            SET status = $1, decided_by = $2, updated_at = NOW()
            WHERE id = $3 AND school_id = $4 AND status = 'pending'
            RETURNING {LEAVE_COLUMNS}
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
            Some(leave) => Ok(leave),
            None => {
                let current = Self::current_status(db, scope, id).await?;
                Err(blocked_transition(current, "Leave request"))
            }
        }
    }

    /// Only the account that filed the request may cancel it.
    #[instrument(skip(db))]
    pub async fn cancel_leave(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
        requested_by: Uuid,
    ) -> Result<LeaveRequest, AppError> {
        let cancelled = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            UPDATE leave_requests
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND school_id = $2 AND requested_by = $3 AND status = 'pending'
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(scope.school_id())
        .bind(requested_by)
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        match cancelled {
            Some(leave) => Ok(leave),
            None => {
                let current = sqlx::query_scalar::<_, RequestStatus>(
                    r#"
                    SELECT status FROM leave_requests
                    WHERE id = $1 AND school_id = $2 AND requested_by = $3
                    "#,
                )
                .bind(id)
                .bind(scope.school_id())
                .bind(requested_by)
                .fetch_optional(db)
                .await
                .map_err(AppError::internal)?;
                Err(blocked_transition(current, "Leave request"))
            }
        }
    }
}
