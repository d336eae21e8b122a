use super::dto::{CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest, UserResponse};
use super::service::UsersService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::auth::dto::TokenClaims;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Bad Request"),
        (status = 409, description = "Email already in use")
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    match UsersService::create(state, req).await {
        Ok(user) => ApiSuccess(
            ApiResponse::success(user, "User created successfully"),
            StatusCode::CREATED,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "List users", body = ApiResponse<Vec<UserResponse>>)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    match UsersService::find_all(state).await {
        Ok(users) => ApiSuccess(
            ApiResponse::success(users, "Users retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Get user", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match UsersService::find_one(state, id).await {
        Ok(user) => ApiSuccess(
            ApiResponse::success(user, "User retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<TokenClaims>,
    Json(req): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    match UsersService::update(state, id, claims.sub, req).await {
        Ok(user) => ApiSuccess(
            ApiResponse::success(user, "User updated successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/password",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = ApiResponse<String>),
        (status = 400, description = "Bad Request"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<TokenClaims>,
    Json(req): Json<UpdatePasswordRequest>,
) -> impl IntoResponse {
    match UsersService::update_password(state, id, claims.sub, req).await {
        Ok(()) => ApiSuccess(
            ApiResponse::success((), "Password updated successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<String>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<TokenClaims>,
) -> impl IntoResponse {
    match UsersService::remove(state, id, claims.sub).await {
        Ok(()) => ApiSuccess(
            ApiResponse::success((), "User deleted successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}
