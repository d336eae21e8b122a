use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub original_title: Option<String>,
    pub subtitle: Option<String>,
    pub description: String,
    #[serde(with = "time::serde::iso8601")]
    pub release_date: OffsetDateTime,
    /// Runtime in minutes.
    pub duration: i32,
    pub status: Option<String>,
    pub age_rating: Option<String>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer_url: Option<String>,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
    pub spoken_languages: Vec<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub popularity: Option<f64>,
    pub user_id: Uuid,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    pub updated_at: OffsetDateTime,
}

impl Movie {
    pub fn belongs_to(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn is_future_release(&self) -> bool {
        self.release_date > OffsetDateTime::now_utc()
    }
}
