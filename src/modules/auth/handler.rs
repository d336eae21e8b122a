use super::dto::{AuthResponse, LoginRequest, RegisterRequest, TokenClaims};
use super::service::AuthService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::users::dto::UserResponse;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tower_cookies::{Cookie, Cookies};

const REFRESH_COOKIE: &str = "refresh_token";

fn refresh_cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_COOKIE, value);
    cookie.set_http_only(true);
    cookie.set_path("/api/v1/auth"); // Allow access for refresh AND logout
    cookie.set_secure(false); // Keep false for HTTP localhost
    cookie.set_max_age(Some(time::Duration::days(7)));
    cookie
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Bad Request"),
        (status = 409, description = "Email already in use")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    match AuthService::register(state, payload).await {
        Ok(response) => ApiSuccess(
            ApiResponse::success(response, "User registered successfully"),
            StatusCode::CREATED,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

/// Login user and get tokens
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    match AuthService::login(state, payload).await {
        Ok((response, refresh_token)) => {
            cookies.add(refresh_cookie(refresh_token));
            ApiSuccess(
                ApiResponse::success(response, "Login successful"),
                StatusCode::OK,
            )
            .into_response()
        }
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

/// Logout user
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out successfully", body = ApiResponse<String>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(claims): Extension<TokenClaims>,
    headers: HeaderMap,
) -> impl IntoResponse {
    // Block the access token for its remaining lifetime.
    if let Some(auth_header) = headers.get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let ttl = claims
                    .exp
                    .saturating_sub(jsonwebtoken::get_current_timestamp() as usize);
                let _ =
                    AuthService::block_token(state.clone(), token.to_string(), ttl as u64).await;
            }
        }
    }

    let _ = AuthService::logout(state, claims.sub).await;

    let mut cookie = Cookie::new(REFRESH_COOKIE, "");
    cookie.set_path("/api/v1/auth");
    cookies.remove(cookie);

    ApiSuccess(
        ApiResponse::success((), "Logged out successfully"),
        StatusCode::OK,
    )
    .into_response()
}

/// Refresh access token
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    responses(
        (status = 200, description = "Token refreshed", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth"
)]
pub async fn refresh(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    let refresh_token = match cookies.get(REFRESH_COOKIE) {
        Some(c) => c.value().to_string(),
        None => {
            return ApiError("Missing refresh token".to_string(), StatusCode::UNAUTHORIZED)
                .into_response();
        }
    };

    // Token format: "user_id:uuid"
    let user_id = match refresh_token
        .split(':')
        .next()
        .and_then(|id| uuid::Uuid::parse_str(id).ok())
    {
        Some(id) => id,
        None => {
            return ApiError("Invalid token format".to_string(), StatusCode::UNAUTHORIZED)
                .into_response();
        }
    };

    match AuthService::refresh_access(state, refresh_token, user_id).await {
        Ok((response, new_refresh_token)) => {
            cookies.add(refresh_cookie(new_refresh_token));
            ApiSuccess(
                ApiResponse::success(response, "Token refreshed"),
                StatusCode::OK,
            )
            .into_response()
        }
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

/// Current authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> impl IntoResponse {
    match AuthService::me(state, claims.sub).await {
        Ok(user) => ApiSuccess(
            ApiResponse::success(user, "User retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}
