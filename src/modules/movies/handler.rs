use super::dto::{
    CreateMovieRequest, FilterMoviesQuery, MovieListResponse, MovieResponse, UpdateMovieRequest,
};
use super::model::Movie;
use super::service::MoviesService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::auth::dto::TokenClaims;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Extension, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = ApiResponse<Movie>),
        (status = 400, description = "Bad Request")
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Json(req): Json<CreateMovieRequest>,
) -> impl IntoResponse {
    match MoviesService::create_movie(state, claims.sub, req).await {
        Ok(movie) => ApiSuccess(
            ApiResponse::success(movie, "Movie created successfully"),
            StatusCode::CREATED,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/movies",
    params(FilterMoviesQuery),
    responses(
        (status = 200, description = "List movies", body = ApiResponse<MovieListResponse>)
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
pub async fn list_movies(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Query(query): Query<FilterMoviesQuery>,
) -> impl IntoResponse {
    match MoviesService::get_movies(state, claims.sub, query).await {
        Ok(movies) => ApiSuccess(
            ApiResponse::success(movies, "Movies retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}",
    params(("id" = Uuid, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Get movie", body = ApiResponse<MovieResponse>),
        (status = 404, description = "Movie not found")
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match MoviesService::get_movie(state, claims.sub, id).await {
        Ok(movie) => ApiSuccess(
            ApiResponse::success(movie, "Movie retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/movies/{id}",
    params(("id" = Uuid, Path, description = "Movie ID")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = ApiResponse<Movie>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Movie not found")
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
pub async fn update_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMovieRequest>,
) -> impl IntoResponse {
    match MoviesService::update_movie(state, claims.sub, id, req).await {
        Ok(movie) => ApiSuccess(
            ApiResponse::success(movie, "Movie updated successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/movies/{id}",
    params(("id" = Uuid, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie deleted", body = ApiResponse<String>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Movie not found")
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match MoviesService::remove_movie(state, claims.sub, id).await {
        Ok(()) => ApiSuccess(
            ApiResponse::success((), "Movie deleted successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/movies/{id}/poster",
    params(("id" = Uuid, Path, description = "Movie ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Poster uploaded", body = ApiResponse<Movie>),
        (status = 400, description = "Bad Request"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Movie not found")
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
pub async fn upload_poster(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> impl IntoResponse {
    upload_image(state, claims.sub, id, multipart, ImageKind::Poster).await
}

#[utoipa::path(
    post,
    path = "/api/v1/movies/{id}/backdrop",
    params(("id" = Uuid, Path, description = "Movie ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Backdrop uploaded", body = ApiResponse<Movie>),
        (status = 400, description = "Bad Request"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Movie not found")
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
pub async fn upload_backdrop(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> impl IntoResponse {
    upload_image(state, claims.sub, id, multipart, ImageKind::Backdrop).await
}

enum ImageKind {
    Poster,
    Backdrop,
}

async fn upload_image(
    state: AppState,
    requester: Uuid,
    id: Uuid,
    mut multipart: Multipart,
    kind: ImageKind,
) -> axum::response::Response {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => {
            return ApiError("Missing file field".to_string(), StatusCode::BAD_REQUEST)
                .into_response();
        }
        Err(e) => return ApiError(e.to_string(), StatusCode::BAD_REQUEST).into_response(),
    };

    let result = match kind {
        ImageKind::Poster => MoviesService::upload_poster(state, requester, id, field).await,
        ImageKind::Backdrop => MoviesService::upload_backdrop(state, requester, id, field).await,
    };

    match result {
        Ok(movie) => ApiSuccess(
            ApiResponse::success(movie, "Image uploaded successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}
