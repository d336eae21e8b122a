use super::dto::{AuthResponse, LoginRequest, RegisterRequest, TokenClaims};
use super::repository::AuthRepository;
use crate::common::error::{ServiceError, ServiceResult};
use crate::common::security;
use crate::modules::users::dto::{CreateUserRequest, UserResponse};
use crate::modules::users::repository::UserRepository;
use crate::modules::users::service::UsersService;
use crate::state::AppState;
use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

const ACCESS_TOKEN_TTL_SECS: u64 = 15 * 60;
const REFRESH_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

pub struct AuthService;

impl AuthService {
    pub async fn register(state: AppState, req: RegisterRequest) -> ServiceResult<AuthResponse> {
        req.validate()
            .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

        let user = UsersService::create(
            state.clone(),
            CreateUserRequest {
                name: req.name,
                email: req.email,
                password: req.password,
            },
        )
        .await?;

        info!(user_id = %user.id, "New user registered");

        // Welcome email is fire-and-forget: registration never waits on mail.
        let mailer = state.mailer.clone();
        let (to, name) = (user.email.clone(), user.name.clone());
        tokio::spawn(async move {
            if let Err(e) = mailer.send_welcome_email(&to, &name).await {
                error!("Failed to send welcome email to {}: {:#}", to, e);
            }
        });

        let access_token = Self::create_access_token(&state, user.id, &user.email)?;
        Ok(AuthResponse {
            access_token,
            expires_in: ACCESS_TOKEN_TTL_SECS,
            user,
        })
    }

    pub async fn login(
        state: AppState,
        req: LoginRequest,
    ) -> ServiceResult<(AuthResponse, String)> {
        req.validate()
            .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

        let user = UserRepository::find_by_email(&state.db, &req.email)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        security::verify_password(&req.password, &user.password_hash)
            .map_err(|_| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        let access_token = Self::create_access_token(&state, user.id, &user.email)?;
        // Format: user_id:random_uuid
        let refresh_token = format!("{}:{}", user.id, Uuid::new_v4());

        let mut redis_conn = state.redis.get_conn().await.map_err(anyhow::Error::from)?;
        AuthRepository::store_refresh_token(
            &mut redis_conn,
            user.id,
            &refresh_token,
            REFRESH_TOKEN_TTL_SECS,
        )
        .await?;

        info!(user_id = %user.id, "User authenticated");

        Ok((
            AuthResponse {
                access_token,
                expires_in: ACCESS_TOKEN_TTL_SECS,
                user: user.into(),
            },
            refresh_token,
        ))
    }

    pub async fn logout(state: AppState, user_id: Uuid) -> ServiceResult<()> {
        let mut redis_conn = state.redis.get_conn().await.map_err(anyhow::Error::from)?;
        AuthRepository::delete_refresh_token(&mut redis_conn, user_id).await?;
        Ok(())
    }

    pub async fn block_token(state: AppState, token: String, ttl: u64) -> ServiceResult<()> {
        let mut redis_conn = state.redis.get_conn().await.map_err(anyhow::Error::from)?;
        AuthRepository::block_token(&mut redis_conn, &token, ttl).await?;
        Ok(())
    }

    pub async fn refresh_access(
        state: AppState,
        refresh_token: String,
        user_id: Uuid,
    ) -> ServiceResult<(AuthResponse, String)> {
        let mut redis_conn = state.redis.get_conn().await.map_err(anyhow::Error::from)?;

        let stored = AuthRepository::get_refresh_token(&mut redis_conn, user_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Unauthorized("Refresh token expired or invalid".to_string())
            })?;
        if stored != refresh_token {
            return Err(ServiceError::Unauthorized(
                "Invalid refresh token".to_string(),
            ));
        }

        let user = UserRepository::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("User not found".to_string()))?;

        let access_token = Self::create_access_token(&state, user.id, &user.email)?;

        // Rotate the refresh token on every use.
        let new_refresh_token = format!("{}:{}", user.id, Uuid::new_v4());
        AuthRepository::store_refresh_token(
            &mut redis_conn,
            user.id,
            &new_refresh_token,
            REFRESH_TOKEN_TTL_SECS,
        )
        .await?;

        Ok((
            AuthResponse {
                access_token,
                expires_in: ACCESS_TOKEN_TTL_SECS,
                user: user.into(),
            },
            new_refresh_token,
        ))
    }

    pub async fn me(state: AppState, user_id: Uuid) -> ServiceResult<UserResponse> {
        UsersService::find_one(state, user_id).await
    }

    fn create_access_token(state: &AppState, user_id: Uuid, email: &str) -> ServiceResult<String> {
        let now = get_current_timestamp() as usize;
        let claims = TokenClaims {
            sub: user_id,
            email: email.to_string(),
            exp: now + ACCESS_TOKEN_TTL_SECS as usize,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
    }
}
