use sqlx::{PgExecutor, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::users::model::{NewUser, User, UserCredentials};
use crate::utils::errors::AppError;

const USER_COLUMNS: &str =
    "id, school_id, first_name, last_name, email, role, is_active, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        Ok(user)
    }

    /// Login-only lookup; the returned row carries the password hash.
    #[instrument(skip(db))]
    pub async fn credentials_by_email(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let creds = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, password, is_active FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(db)
        .await
        .map_err(AppError::internal)?;

        Ok(creds)
    }

    #[instrument(skip(executor, new_user))]
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        new_user: NewUser,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (school_id, first_name, last_name, email, password, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.school_id)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            AppError::database(
                e,
                &format!("User with email {} already exists", new_user.email),
            )
        })?;

        Ok(user)
    }

    /// Soft deactivation; identities are never hard-deleted.
    #[instrument(skip(executor))]
    pub async fn deactivate<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(AppError::internal)?;

        Ok(())
    }
}
