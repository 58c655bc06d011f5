//! Account service: registration, login and token refresh
//!
//! Password hashing and verification run on the blocking pool.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::UserRepository;
use fitness_trainer_shared::types::{AuthTokens, LoginRequest, RegisterRequest};
use fitness_trainer_shared::validation::{validate_display_name, validate_email, validate_password};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct UserService;

impl UserService {
    pub async fn register(
        pool: &PgPool,
        jwt: &JwtService,
        req: &RegisterRequest,
    ) -> Result<AuthTokens, ApiError> {
        let name = req.name.trim();
        let email = req.email.trim().to_lowercase();

        validate_display_name(name).map_err(ApiError::Validation)?;
        validate_email(&email).map_err(ApiError::Validation)?;
        validate_password(&req.password).map_err(ApiError::Validation)?;

        if UserRepository::email_exists(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(pool, name, &email, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user.id, "User registered");
        Self::issue_tokens(jwt, user.id)
    }

    pub async fn login(
        pool: &PgPool,
        jwt: &JwtService,
        req: &LoginRequest,
    ) -> Result<AuthTokens, ApiError> {
        let email = req.email.trim().to_lowercase();

        let user = UserRepository::find_by_email(pool, &email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = PasswordService::verify_async(req.password.clone(), user.password_hash)
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        Self::issue_tokens(jwt, user.id)
    }

    /// Trade a refresh token for a fresh pair
    pub async fn refresh_token(
        pool: &PgPool,
        jwt: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

        if !UserRepository::exists(pool, claims.sub)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Unauthorized("User not found".to_string()));
        }

        Self::issue_tokens(jwt, claims.sub)
    }

    fn issue_tokens(jwt: &JwtService, user_id: Uuid) -> Result<AuthTokens, ApiError> {
        Ok(AuthTokens {
            access_token: jwt
                .generate_access_token(user_id)
                .map_err(ApiError::Internal)?,
            refresh_token: jwt
                .generate_refresh_token(user_id)
                .map_err(ApiError::Internal)?,
            token_type: "Bearer".to_string(),
            expires_in: jwt.access_token_expiry_secs(),
        })
    }
}
