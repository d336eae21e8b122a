use super::dto::{CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest, UserResponse};
use super::repository::UserRepository;
use crate::common::error::{ServiceError, ServiceResult};
use crate::common::security;
use crate::state::AppState;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct UsersService;

impl UsersService {
    pub async fn create(state: AppState, req: CreateUserRequest) -> ServiceResult<UserResponse> {
        req.validate()
            .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

        if !security::is_strong_password(&req.password) {
            return Err(ServiceError::BadRequest(
                "Password must contain upper and lower case letters and a digit".to_string(),
            ));
        }

        if UserRepository::find_by_email(&state.db, &req.email)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict("Email already in use".to_string()));
        }

        let password_hash = security::hash_password(&req.password)?;
        let user = UserRepository::create(&state.db, &req.name, &req.email, &password_hash).await?;

        info!(user_id = %user.id, "User created");
        Ok(user.into())
    }

    pub async fn find_all(state: AppState) -> ServiceResult<Vec<UserResponse>> {
        let users = UserRepository::find_all(&state.db).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn find_one(state: AppState, id: Uuid) -> ServiceResult<UserResponse> {
        let user = UserRepository::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    pub async fn update(
        state: AppState,
        id: Uuid,
        requester: Uuid,
        req: UpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        req.validate()
            .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

        if id != requester {
            return Err(ServiceError::Forbidden(
                "You can only update your own account".to_string(),
            ));
        }

        let existing = UserRepository::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if let Some(email) = &req.email {
            if *email != existing.email
                && UserRepository::find_by_email(&state.db, email)
                    .await?
                    .is_some()
            {
                return Err(ServiceError::Conflict("Email already in use".to_string()));
            }
        }

        let user =
            UserRepository::update(&state.db, id, req.name.as_deref(), req.email.as_deref())
                .await?;

        info!(user_id = %user.id, "User updated");
        Ok(user.into())
    }

    pub async fn update_password(
        state: AppState,
        id: Uuid,
        requester: Uuid,
        req: UpdatePasswordRequest,
    ) -> ServiceResult<()> {
        req.validate()
            .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

        if id != requester {
            return Err(ServiceError::Forbidden(
                "You can only change your own password".to_string(),
            ));
        }

        let user = UserRepository::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        security::verify_password(&req.current_password, &user.password_hash)
            .map_err(|_| ServiceError::BadRequest("Current password is incorrect".to_string()))?;

        if !security::is_strong_password(&req.new_password) {
            return Err(ServiceError::BadRequest(
                "Password must contain upper and lower case letters and a digit".to_string(),
            ));
        }

        let password_hash = security::hash_password(&req.new_password)?;
        UserRepository::update_password(&state.db, id, &password_hash).await?;

        info!(user_id = %id, "Password updated");
        Ok(())
    }

    pub async fn remove(state: AppState, id: Uuid, requester: Uuid) -> ServiceResult<()> {
        if id != requester {
            return Err(ServiceError::Forbidden(
                "You can only delete your own account".to_string(),
            ));
        }

        if !UserRepository::delete(&state.db, id).await? {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }
}
