use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::TenantScope;
use crate::modules::library::model::{BookRequest, CreateBookRequestDto, IssueRecord};
use crate::utils::errors::AppError;
use crate::utils::status::{RequestStatus, blocked_transition};

const REQUEST_COLUMNS: &str =
    "id, school_id, student_id, title, author, status, decided_by, created_at, updated_at";
const ISSUE_COLUMNS: &str =
    "id, school_id, student_id, request_id, book_title, issued_at, due_at, returned_at";

const LOAN_DAYS: i64 = 14;

pub struct LibraryService;

impl LibraryService {
    #[instrument(skip(db, dto))]
    pub async fn create_request(
        db: &PgPool,
        scope: &TenantScope,
        student_id: Uuid,
        dto: CreateBookRequestDto,
    ) -> Result<BookRequest, AppError> {
        let request = sqlx::query_as::<_, BookRequest>(&format!(
            r#"
            INSERT INTO book_requests (school_id, student_id, title, author)
            VALUES ($1, $2, $3, $4)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(scope.school_id())
        .bind(student_id)
        .bind(&dto.title)
        .bind(&dto.author)
        .fetch_one(db)
        .await
        .map_err(AppError::internal)?;

        Ok(request)
    }

    #[instrument(skip(db))]
    pub async fn list_requests(
        db: &PgPool,
        scope: &TenantScope,
    ) -> Result<Vec<BookRequest>, AppError> {
        let requests = sqlx::query_as::<_, BookRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM book_requests
            WHERE school_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(scope.school_id())
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(requests)
    }

    #[instrument(skip(db))]
    pub async fn list_requests_for_student(
        db: &PgPool,
        scope: &TenantScope,
        student_id: Uuid,
    ) -> Result<Vec<BookRequest>, AppError> {
        let requests = sqlx::query_as::<_, BookRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM book_requests
            WHERE school_id = $1 AND student_id = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(scope.school_id())
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(requests)
    }

    async fn current_status(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Option<RequestStatus>, AppError> {
        sqlx::query_scalar::<_, RequestStatus>(
            "SELECT status FROM book_requests WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(scope.school_id())
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)
    }

    /// Approval and issue-record creation happen in one transaction behind a
    /// `status = 'pending'` guard, so two racing approvals cannot both
    /// succeed and an issue record can never be duplicated.
    #[instrument(skip(db))]
    pub async fn approve_request(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
        decided_by: Uuid,
    ) -> Result<IssueRecord, AppError> {
        let mut tx = db.begin().await.map_err(AppError::internal)?;

        let approved = sqlx::query_as::<_, BookRequest>(&format!(
            r#"
            UPDATE book_requests
            SET status = 'approved', decided_by = $1, updated_at = NOW()
            WHERE id = $2 AND school_id = $3 AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(decided_by)
        .bind(id)
        .bind(scope.school_id())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::internal)?;

        let Some(request) = approved else {
            drop(tx);
            let current = Self::current_status(db, scope, id).await?;
            return Err(blocked_transition(current, "Book request"));
        };

        let due_at = Utc::now() + Duration::days(LOAN_DAYS);

        let issue = sqlx::query_as::<_, IssueRecord>(&format!(
            r#"
            INSERT INTO issue_records (school_id, student_id, request_id, book_title, due_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ISSUE_COLUMNS}
            "#
        ))
        .bind(scope.school_id())
        .bind(request.student_id)
        .bind(request.id)
        .bind(&request.title)
        .bind(due_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::database(e, "Book request has already been issued"))?;

        tx.commit().await.map_err(AppError::internal)?;

        Ok(issue)
    }

    #[instrument(skip(db))]
    pub async fn reject_request(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
        decided_by: Uuid,
    ) -> Result<BookRequest, AppError> {
        let rejected = sqlx::query_as::<_, BookRequest>(&format!(
            r#"
            UPDATE book_requests
            SET status = 'rejected', decided_by = $1, updated_at = NOW()
            WHERE id = $2 AND school_id = $3 AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(decided_by)
        .bind(id)
        .bind(scope.school_id())
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        match rejected {
            Some(request) => Ok(request),
            None => {
                let current = Self::current_status(db, scope, id).await?;
                Err(blocked_transition(current, "Book request"))
            }
        }
    }

    /// Owner cancellation; the student id is part of the guard so one
    /// student cannot cancel another's request.
    #[instrument(skip(db))]
    pub async fn cancel_request(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
        student_id: Uuid,
    ) -> Result<BookRequest, AppError> {
        let cancelled = sqlx::query_as::<_, BookRequest>(&format!(
            r#"
            UPDATE book_requests
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND school_id = $2 AND student_id = $3 AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(scope.school_id())
        .bind(student_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        match cancelled {
            Some(request) => Ok(request),
            None => {
                let current = sqlx::query_scalar::<_, RequestStatus>(
                    r#"
                    SELECT status FROM book_requests
                    WHERE id = $1 AND school_id = $2 AND student_id = $3
                    "#,
                )
                .bind(id)
                .bind(scope.school_id())
                .bind(student_id)
                .fetch_optional(db)
                .await
                .map_err(AppError::internal)?;
                Err(blocked_transition(current, "Book request"))
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn list_issues(
        db: &PgPool,
        scope: &TenantScope,
    ) -> Result<Vec<IssueRecord>, AppError> {
        let issues = sqlx::query_as::<_, IssueRecord>(&format!(
            r#"
            SELECT {ISSUE_COLUMNS}
            FROM issue_records
            WHERE school_id = $1
            ORDER BY issued_at DESC
            "#
        ))
        .bind(scope.school_id())
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(issues)
    }

    #[instrument(skip(db))]
    pub async fn list_issues_for_student(
        db: &PgPool,
        scope: &TenantScope,
        student_id: Uuid,
    ) -> Result<Vec<IssueRecord>, AppError> {
        let issues = sqlx::query_as::<_, IssueRecord>(&format!(
            r#"
            SELECT {ISSUE_COLUMNS}
            FROM issue_records
            WHERE school_id = $1 AND student_id = $2
            ORDER BY issued_at DESC
            "#
        ))
        .bind(scope.school_id())
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(issues)
    }

    /// Return is conditional on `returned_at IS NULL`; returning twice is a
    /// conflict, not a silent overwrite of the original return time.
    #[instrument(skip(db))]
    pub async fn return_issue(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<IssueRecord, AppError> {
        let returned = sqlx::query_as::<_, IssueRecord>(&format!(
            r#"
            UPDATE issue_records
            SET returned_at = NOW()
            WHERE id = $1 AND school_id = $2 AND returned_at IS NULL
            RETURNING {ISSUE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(scope.school_id())
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        match returned {
            Some(issue) => Ok(issue),
            None => {
                let exists = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM issue_records WHERE id = $1 AND school_id = $2",
                )
                .bind(id)
                .bind(scope.school_id())
                .fetch_one(db)
                .await
                .map_err(AppError::internal)?;

                if exists > 0 {
                    Err(AppError::conflict("Book has already been returned"))
                } else {
                    Err(AppError::not_found("Issue record not found"))
                }
            }
        }
    }
}
