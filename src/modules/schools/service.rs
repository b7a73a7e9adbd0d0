use sqlx::PgPool;
use tracing::instrument;

use crate::modules::schools::model::{CreateSchoolDto, School, SchoolWithAdmin};
use crate::modules::users::model::{NewUser, UserRole};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

pub struct SchoolService;

impl SchoolService {
    /// School and first admin are created in one transaction; a tenant with
    /// no admin account would be unreachable.
    #[instrument(skip(db, dto))]
    pub async fn create_school(
        db: &PgPool,
        dto: CreateSchoolDto,
    ) -> Result<SchoolWithAdmin, AppError> {
        let password_hash = hash_password(&dto.admin_password)?;

        let mut tx = db.begin().await.map_err(AppError::internal)?;

        let school = sqlx::query_as::<_, School>(
            r#"
            INSERT INTO schools (name, address)
            VALUES ($1, $2)
            RETURNING id, name, address, created_at, updated_at
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.address)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::database(e, &format!("School named {} already exists", dto.name))
        })?;

        let admin = UserService::create(
            &mut *tx,
            NewUser {
                school_id: Some(school.id),
                first_name: dto.admin_first_name,
                last_name: dto.admin_last_name,
                email: dto.admin_email,
                password_hash,
                role: UserRole::SchoolAdmin,
            },
        )
        .await?;

        tx.commit().await.map_err(AppError::internal)?;

        Ok(SchoolWithAdmin { school, admin })
    }

    #[instrument(skip(db))]
    pub async fn list_schools(db: &PgPool) -> Result<Vec<School>, AppError> {
        let schools = sqlx::query_as::<_, School>(
            "SELECT id, name, address, created_at, updated_at FROM schools ORDER BY name",
        )
        .fetch_all(db)
        .await
        .map_err(AppError::internal)?;

        Ok(schools)
    }
}
