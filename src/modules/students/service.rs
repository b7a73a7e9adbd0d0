use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::TenantScope;
use crate::modules::classes::model::ClassRef;
use crate::modules::classes::service::ClassService;
use crate::modules::students::model::{CreateStudentDto, Student, UpdateStudentDto};
use crate::modules::users::model::{NewUser, UserRole};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationParams;
use crate::utils::password::hash_password;

const STUDENT_COLUMNS: &str = "id, school_id, user_id, first_name, last_name, email, \
     class_name, section, class_id, parent_email, is_active, created_at, updated_at";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto))]
    pub async fn create_student(
        db: &PgPool,
        scope: &TenantScope,
        dto: CreateStudentDto,
    ) -> Result<Student, AppError> {
        // A caller-supplied class id must exist in this school.
        if let Some(class_id) = dto.class_id {
            let resolved =
                ClassService::resolve_ref(db, scope, &ClassRef::Resolved(class_id)).await?;
            if resolved.is_none() {
                return Err(AppError::bad_request("Unknown class for this school"));
            }
        }

        let mut tx = db.begin().await.map_err(AppError::internal)?;

        let user_id = match (&dto.email, &dto.login_password) {
            (Some(email), Some(password)) => {
                let user = UserService::create(
                    &mut *tx,
                    NewUser {
                        school_id: Some(scope.school_id()),
                        first_name: dto.first_name.clone(),
                        last_name: dto.last_name.clone(),
                        email: email.clone(),
                        password_hash: hash_password(password)?,
                        role: UserRole::Student,
                    },
                )
                .await?;
                Some(user.id)
            }
            (None, Some(_)) => {
                return Err(AppError::bad_request(
                    "A login password requires a student email",
                ));
            }
            _ => None,
        };

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students
                (school_id, user_id, first_name, last_name, email,
                 class_name, section, class_id, parent_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(scope.school_id())
        .bind(user_id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&dto.class_name)
        .bind(&dto.section)
        .bind(dto.class_id)
        .bind(&dto.parent_email)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::internal)?;

        tx.commit().await.map_err(AppError::internal)?;

        Ok(student)
    }

    #[instrument(skip(db, params))]
    pub async fn list_students(
        db: &PgPool,
        scope: &TenantScope,
        params: &PaginationParams,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let students = sqlx::query_as::<_, Student>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE school_id = $1 AND is_active
            ORDER BY last_name, first_name
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(scope.school_id())
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE school_id = $1 AND is_active",
        )
        .bind(scope.school_id())
        .fetch_one(db)
        .await
        .map_err(AppError::internal)?;

        Ok((students, total))
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_id(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 AND school_id = $2"
        ))
        .bind(id)
        .bind(scope.school_id())
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("Student not found"))?;

        Ok(student)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        if let Some(class_id) = dto.class_id {
            let resolved =
                ClassService::resolve_ref(db, scope, &ClassRef::Resolved(class_id)).await?;
            if resolved.is_none() {
                return Err(AppError::bad_request("Unknown class for this school"));
            }
        }

        let existing = Self::get_student_by_id(db, scope, id).await?;

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET first_name = $1, last_name = $2, class_name = $3, section = $4,
                class_id = $5, parent_email = $6, updated_at = NOW()
            WHERE id = $7 AND school_id = $8
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(dto.first_name.unwrap_or(existing.first_name))
        .bind(dto.last_name.unwrap_or(existing.last_name))
        .bind(dto.class_name.unwrap_or(existing.class_name))
        .bind(dto.section.unwrap_or(existing.section))
        .bind(dto.class_id.or(existing.class_id))
        .bind(dto.parent_email.or(existing.parent_email))
        .bind(id)
        .bind(scope.school_id())
        .fetch_one(db)
        .await
        .map_err(AppError::internal)?;

        Ok(student)
    }

    /// Soft deactivation of the record and any linked login account.
    #[instrument(skip(db))]
    pub async fn deactivate_student(
        db: &PgPool,
        scope: &TenantScope,
        id: Uuid,
    ) -> Result<(), AppError> {
        let student = Self::get_student_by_id(db, scope, id).await?;

        let mut tx = db.begin().await.map_err(AppError::internal)?;

        sqlx::query(
            r#"
            UPDATE students SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            "#,
        )
        .bind(id)
        .bind(scope.school_id())
        .execute(&mut *tx)
        .await
        .map_err(AppError::internal)?;

        if let Some(user_id) = student.user_id {
            UserService::deactivate(&mut *tx, user_id).await?;
        }

        tx.commit().await.map_err(AppError::internal)?;

        Ok(())
    }

    /// Self-service lookup: the student record owned by the calling account.
    #[instrument(skip(db))]
    pub async fn find_by_user(
        db: &PgPool,
        scope: &TenantScope,
        user_id: Uuid,
    ) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE school_id = $1 AND user_id = $2 AND is_active
            "#
        ))
        .bind(scope.school_id())
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        Ok(student)
    }

    /// Parent-of-child lookup. The parent email predicate is part of the
    /// query itself, so a child of another parent is indistinguishable from
    /// a student that does not exist.
    #[instrument(skip(db))]
    pub async fn find_child(
        db: &PgPool,
        scope: &TenantScope,
        student_id: Uuid,
        parent_email: &str,
    ) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE id = $1 AND school_id = $2 AND parent_email = $3 AND is_active
            "#
        ))
        .bind(student_id)
        .bind(scope.school_id())
        .bind(parent_email)
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn list_children(
        db: &PgPool,
        scope: &TenantScope,
        parent_email: &str,
    ) -> Result<Vec<Student>, AppError> {
        let students = sqlx::query_as::<_, Student>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE school_id = $1 AND parent_email = $2 AND is_active
            ORDER BY first_name
            "#
        ))
        .bind(scope.school_id())
        .bind(parent_email)
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(students)
    }
}
