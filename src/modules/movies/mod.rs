use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;

const MAX_IMAGE_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub mod dto;
pub mod events;
pub mod handler;
pub mod model;
pub mod repository;
pub mod scheduler;
pub mod service;

pub fn router(state: AppState) -> axum::Router<AppState> {
    Router::new()
        .route("/", post(handler::create_movie).get(handler::list_movies))
        .route(
            "/{id}",
            get(handler::get_movie)
                .patch(handler::update_movie)
                .delete(handler::delete_movie),
        )
        .route(
            "/{id}/poster",
            post(handler::upload_poster)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::max(MAX_IMAGE_UPLOAD_BYTES))
                .layer(RequestBodyLimitLayer::new(MAX_IMAGE_UPLOAD_BYTES)),
        )
        .route(
            "/{id}/backdrop",
            post(handler::upload_backdrop)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::max(MAX_IMAGE_UPLOAD_BYTES))
                .layer(RequestBodyLimitLayer::new(MAX_IMAGE_UPLOAD_BYTES)),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ))
}
