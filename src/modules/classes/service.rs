use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::TenantScope;
use crate::modules::classes::model::{Class, ClassRef, CreateClassDto};
use crate::utils::errors::AppError;

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db, dto))]
    pub async fn create_class(
        db: &PgPool,
        scope: &TenantScope,
        dto: CreateClassDto,
    ) -> Result<Class, AppError> {
        let class = sqlx::query_as::<_, Class>(
            r#"
            INSERT INTO classes (school_id, name, section)
            VALUES ($1, $2, $3)
            RETURNING id, school_id, name, section, created_at
            "#,
        )
        .bind(scope.school_id())
        .bind(&dto.name)
        .bind(&dto.section)
        .fetch_one(db)
        .await
        .map_err(|e| {
            AppError::database(
                e,
                &format!("Class {} {} already exists", dto.name, dto.section),
            )
        })?;

        Ok(class)
    }

    #[instrument(skip(db))]
    pub async fn list_classes(db: &PgPool, scope: &TenantScope) -> Result<Vec<Class>, AppError> {
        let classes = sqlx::query_as::<_, Class>(
            r#"
            SELECT id, school_id, name, section, created_at
            FROM classes
            WHERE school_id = $1
            ORDER BY name, section
            "#,
        )
        .bind(scope.school_id())
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(classes)
    }

    /// Resolves a [`ClassRef`] to the canonical class id within the tenant.
    ///
    /// `None` is a valid outcome, not an error: a newly admitted student may
    /// name a class that has not been set up yet, and a populated id is still
    /// re-checked against the tenant so a stale or foreign id cannot leak
    /// another school's schedule.
    #[instrument(skip(db))]
    pub async fn resolve_ref(
        db: &PgPool,
        scope: &TenantScope,
        class_ref: &ClassRef,
    ) -> Result<Option<Uuid>, AppError> {
        let id = match class_ref {
            ClassRef::Resolved(id) => {
                sqlx::query_scalar::<_, Uuid>(
                    "SELECT id FROM classes WHERE id = $1 AND school_id = $2",
                )
                .bind(id)
                .bind(scope.school_id())
                .fetch_optional(db)
                .await
                .map_err(AppError::internal)?
            }
            ClassRef::Named { name, section } => {
                sqlx::query_scalar::<_, Uuid>(
                    "SELECT id FROM classes WHERE school_id = $1 AND name = $2 AND section = $3",
                )
                .bind(scope.school_id())
                .bind(name)
                .bind(section)
                .fetch_optional(db)
                .await
                .map_err(AppError::internal)?
            }
        };

        Ok(id)
    }
}
