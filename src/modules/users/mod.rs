use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{get, patch, post};

pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub fn router(state: AppState) -> axum::Router<AppState> {
    let require_auth =
        middleware::from_fn_with_state(state, crate::middleware::auth::auth_middleware);

    // Registration is open; everything else needs a valid token.
    Router::new()
        .route(
            "/",
            post(handler::create_user)
                .merge(get(handler::list_users).route_layer(require_auth.clone())),
        )
        .route(
            "/{id}",
            get(handler::get_user)
                .patch(handler::update_user)
                .delete(handler::delete_user)
                .route_layer(require_auth.clone()),
        )
        .route(
            "/{id}/password",
            patch(handler::update_password).route_layer(require_auth),
        )
}
