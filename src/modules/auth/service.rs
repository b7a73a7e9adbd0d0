use sqlx::PgPool;
use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::verify_password;

pub struct AuthService;

impl AuthService {
    /// The same message covers unknown email, wrong password and deactivated
    /// accounts so the endpoint cannot be used to enumerate users.
    #[instrument(skip(db, jwt_config, dto))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let invalid = || AppError::unauthorized("Invalid email or password");

        let creds = UserService::credentials_by_email(db, &dto.email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&dto.password, &creds.password)? {
            return Err(invalid());
        }

        if !creds.is_active {
            return Err(invalid());
        }

        let user = UserService::get_by_id(db, creds.id)
            .await?
            .ok_or_else(invalid)?;

        let access_token = create_access_token(user.id, &user.email, jwt_config)?;

        Ok(LoginResponse { access_token, user })
    }
}
