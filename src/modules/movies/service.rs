use super::dto::{
    CreateMovieRequest, FilterMoviesQuery, MovieListResponse, MovieResponse, PaginationMeta,
    UpdateMovieRequest,
};
use super::model::Movie;
use super::repository::{MovieFilters, MovieRepository};
use crate::common::error::{ServiceError, ServiceResult};
use crate::common::upload;
use crate::state::AppState;
use axum::extract::multipart::Field;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

pub struct MoviesService;

impl MoviesService {
    pub async fn create_movie(
        state: AppState,
        user_id: Uuid,
        req: CreateMovieRequest,
    ) -> ServiceResult<Movie> {
        req.validate()
            .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

        let movie = MovieRepository::create(&state.db, user_id, &req).await?;
        info!(movie_id = %movie.id, "Movie created");

        if movie.is_future_release() {
            state.scheduler.schedule_release_notification(&movie).await;
        }

        Ok(movie)
    }

    pub async fn get_movies(
        state: AppState,
        requester: Uuid,
        query: FilterMoviesQuery,
    ) -> ServiceResult<MovieListResponse> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let filters = MovieFilters {
            search: query.search,
            min_duration: query.min_duration,
            max_duration: query.max_duration,
            start_date: query.start_date,
            end_date: query.end_date,
            genre: query.genre,
            limit,
            offset: (page - 1) * limit,
            sort_by: query.sort_by.unwrap_or_default(),
            sort_order: query.sort_order.unwrap_or_default(),
        };

        let (movies, total) = MovieRepository::find_all(&state.db, &filters).await?;

        let data = movies
            .into_iter()
            .map(|movie| MovieResponse {
                is_owner: movie.belongs_to(requester),
                movie,
            })
            .collect();

        Ok(MovieListResponse {
            data,
            pagination: PaginationMeta {
                page,
                limit,
                total,
                total_pages: (total + limit - 1) / limit,
            },
        })
    }

    pub async fn get_movie(
        state: AppState,
        requester: Uuid,
        id: Uuid,
    ) -> ServiceResult<MovieResponse> {
        let movie = MovieRepository::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Movie not found".to_string()))?;

        Ok(MovieResponse {
            is_owner: movie.belongs_to(requester),
            movie,
        })
    }

    pub async fn update_movie(
        state: AppState,
        requester: Uuid,
        id: Uuid,
        req: UpdateMovieRequest,
    ) -> ServiceResult<Movie> {
        req.validate()
            .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

        let existing = MovieRepository::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Movie not found".to_string()))?;

        if !existing.belongs_to(requester) {
            return Err(ServiceError::Forbidden(
                "You can only update your own movies".to_string(),
            ));
        }

        let release_date_changed = req.release_date.is_some();

        let movie = MovieRepository::update(&state.db, id, &req)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Movie not found".to_string()))?;

        info!(movie_id = %movie.id, "Movie updated");

        state
            .scheduler
            .sync_after_update(&movie, release_date_changed)
            .await;

        Ok(movie)
    }

    pub async fn remove_movie(state: AppState, requester: Uuid, id: Uuid) -> ServiceResult<()> {
        let movie = MovieRepository::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Movie not found".to_string()))?;

        if !movie.belongs_to(requester) {
            return Err(ServiceError::Forbidden(
                "You can only delete your own movies".to_string(),
            ));
        }

        // Cancel before the row disappears so a worker tick in between cannot
        // claim a job for a movie mid-delete.
        state.scheduler.cancel_release_notification(id).await;

        MovieRepository::delete(&state.db, id).await?;
        info!(movie_id = %id, "Movie deleted");

        Self::delete_stored_image(&state, movie.poster_url.as_deref()).await;
        Self::delete_stored_image(&state, movie.backdrop_url.as_deref()).await;

        Ok(())
    }

    pub async fn upload_poster(
        state: AppState,
        requester: Uuid,
        id: Uuid,
        field: Field<'_>,
    ) -> ServiceResult<Movie> {
        let movie = Self::owned_movie(&state, requester, id).await?;

        let key = Self::image_key(id, "poster", field.file_name());
        let key = upload::stream_image_to_s3(&state.storage, field, key)
            .await
            .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

        Self::delete_stored_image(&state, movie.poster_url.as_deref()).await;

        let url = Self::public_url(&state, &key);
        let movie = MovieRepository::set_poster_url(&state.db, id, &url).await?;

        info!(movie_id = %id, key = %key, "Poster uploaded");
        Ok(movie)
    }

    pub async fn upload_backdrop(
        state: AppState,
        requester: Uuid,
        id: Uuid,
        field: Field<'_>,
    ) -> ServiceResult<Movie> {
        let movie = Self::owned_movie(&state, requester, id).await?;

        let key = Self::image_key(id, "backdrop", field.file_name());
        let key = upload::stream_image_to_s3(&state.storage, field, key)
            .await
            .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

        Self::delete_stored_image(&state, movie.backdrop_url.as_deref()).await;

        let url = Self::public_url(&state, &key);
        let movie = MovieRepository::set_backdrop_url(&state.db, id, &url).await?;

        info!(movie_id = %id, key = %key, "Backdrop uploaded");
        Ok(movie)
    }

    async fn owned_movie(state: &AppState, requester: Uuid, id: Uuid) -> ServiceResult<Movie> {
        let movie = MovieRepository::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Movie not found".to_string()))?;

        if !movie.belongs_to(requester) {
            return Err(ServiceError::Forbidden(
                "You can only modify your own movies".to_string(),
            ));
        }

        Ok(movie)
    }

    fn image_key(movie_id: Uuid, kind: &str, file_name: Option<&str>) -> String {
        let file_name = file_name.unwrap_or("upload.bin");
        format!(
            "movies/{}/{}/{}-{}",
            movie_id,
            kind,
            time::OffsetDateTime::now_utc().unix_timestamp(),
            file_name
        )
    }

    fn public_url(state: &AppState, key: &str) -> String {
        format!(
            "{}/{}/{}",
            state.config.storage_endpoint.trim_end_matches('/'),
            state.config.storage_bucket,
            key
        )
    }

    /// Best-effort cleanup of a replaced or orphaned object. The URL prefix
    /// is stripped back to the bucket key; foreign URLs are left alone.
    async fn delete_stored_image(state: &AppState, url: Option<&str>) {
        let Some(url) = url else { return };
        let prefix = format!(
            "{}/{}/",
            state.config.storage_endpoint.trim_end_matches('/'),
            state.config.storage_bucket
        );
        let Some(key) = url.strip_prefix(&prefix) else {
            return;
        };

        if let Err(e) = state.storage.delete_object(key).await {
            warn!(key = %key, "Failed to delete stored image: {}", e);
        }
    }
}
