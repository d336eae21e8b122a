use super::model::Movie;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMovieRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(max = 255))]
    pub original_title: Option<String>,
    #[validate(length(max = 255))]
    pub subtitle: Option<String>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[serde(with = "time::serde::iso8601")]
    pub release_date: OffsetDateTime,
    #[validate(range(min = 1, max = 1000, message = "Duration must be 1-1000 minutes"))]
    pub duration: i32,
    #[validate(length(max = 50))]
    pub status: Option<String>,
    #[validate(length(max = 20))]
    pub age_rating: Option<String>,
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
    #[validate(range(min = 0.0))]
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    #[validate(url)]
    pub poster_url: Option<String>,
    #[validate(url)]
    pub backdrop_url: Option<String>,
    #[validate(url)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub production_companies: Vec<String>,
    #[serde(default)]
    pub spoken_languages: Vec<String>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub vote_average: Option<f64>,
    #[validate(range(min = 0))]
    pub vote_count: Option<i32>,
    #[validate(range(min = 0.0))]
    pub popularity: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMovieRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 255))]
    pub original_title: Option<String>,
    #[validate(length(max = 255))]
    pub subtitle: Option<String>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,
    #[serde(default, with = "time::serde::iso8601::option")]
    pub release_date: Option<OffsetDateTime>,
    #[validate(range(min = 1, max = 1000, message = "Duration must be 1-1000 minutes"))]
    pub duration: Option<i32>,
    #[validate(length(max = 50))]
    pub status: Option<String>,
    #[validate(length(max = 20))]
    pub age_rating: Option<String>,
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
    #[validate(range(min = 0.0))]
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    #[validate(url)]
    pub trailer_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub production_companies: Option<Vec<String>>,
    pub spoken_languages: Option<Vec<String>>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub vote_average: Option<f64>,
    #[validate(range(min = 0))]
    pub vote_count: Option<i32>,
    #[validate(range(min = 0.0))]
    pub popularity: Option<f64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FilterMoviesQuery {
    /// Matches against title and description.
    pub search: Option<String>,
    pub min_duration: Option<i32>,
    pub max_duration: Option<i32>,
    #[serde(default, with = "time::serde::iso8601::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::iso8601::option")]
    pub end_date: Option<OffsetDateTime>,
    pub genre: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieResponse {
    #[serde(flatten)]
    pub movie: Movie,
    pub is_owner: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieListResponse {
    pub data: Vec<MovieResponse>,
    pub pagination: PaginationMeta,
}
