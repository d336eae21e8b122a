use crate::common::response::ApiError;
use crate::modules::auth::dto::TokenClaims;
use crate::modules::auth::repository::AuthRepository;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_header| auth_header.to_str().ok())
        .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
        .map(|token| token.to_owned());

    let Some(token) = token else {
        return Err(ApiError(
            "Unauthorized: Missing or invalid token".to_string(),
            StatusCode::UNAUTHORIZED,
        ));
    };

    // Revoked tokens are kept in Redis until they would have expired anyway.
    let mut redis = state.redis.get_conn().await.map_err(|_| {
        ApiError(
            "Internal Server Error: Redis unavailable".to_string(),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    })?;

    let is_blocked = AuthRepository::is_token_blocked(&mut redis, &token)
        .await
        .map_err(|_| {
            ApiError(
                "Internal Server Error: Redis error".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        })?;

    if is_blocked {
        return Err(ApiError(
            "Unauthorized: Token is blocked/revoked".to_string(),
            StatusCode::UNAUTHORIZED,
        ));
    }

    let claims = decode::<TokenClaims>(
        &token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| {
        ApiError(
            "Unauthorized: Invalid token signature".to_string(),
            StatusCode::UNAUTHORIZED,
        )
    })?
    .claims;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
