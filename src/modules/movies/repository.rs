use super::dto::{CreateMovieRequest, UpdateMovieRequest};
use super::model::Movie;
use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MovieFilters {
    pub search: Option<String>,
    pub min_duration: Option<i32>,
    pub max_duration: Option<i32>,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
    pub genre: Option<String>,
    pub limit: i64,
    pub offset: i64,
    pub sort_by: String,
    pub sort_order: String,
}

pub struct MovieRepository;

impl MovieRepository {
    pub async fn create(pool: &PgPool, user_id: Uuid, req: &CreateMovieRequest) -> Result<Movie> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (
                title, original_title, subtitle, description, release_date,
                duration, status, age_rating, budget, revenue, profit,
                poster_url, backdrop_url, trailer_url, genres,
                production_companies, spoken_languages, vote_average,
                vote_count, popularity, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.original_title)
        .bind(&req.subtitle)
        .bind(&req.description)
        .bind(req.release_date)
        .bind(req.duration)
        .bind(&req.status)
        .bind(&req.age_rating)
        .bind(req.budget)
        .bind(req.revenue)
        .bind(req.profit)
        .bind(&req.poster_url)
        .bind(&req.backdrop_url)
        .bind(&req.trailer_url)
        .bind(&req.genres)
        .bind(&req.production_companies)
        .bind(&req.spoken_languages)
        .bind(req.vote_average)
        .bind(req.vote_count)
        .bind(req.popularity)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(movie)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(movie)
    }

    pub async fn find_all(pool: &PgPool, filters: &MovieFilters) -> Result<(Vec<Movie>, i64)> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM movies WHERE 1=1");
        Self::apply_filters(&mut query, filters);
        query.push(format!(
            " ORDER BY {} {}",
            Self::sort_column(&filters.sort_by),
            Self::sort_direction(&filters.sort_order)
        ));
        query.push(" LIMIT ").push_bind(filters.limit);
        query.push(" OFFSET ").push_bind(filters.offset);

        let movies = query.build_query_as::<Movie>().fetch_all(pool).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM movies WHERE 1=1");
        Self::apply_filters(&mut count, filters);
        let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

        Ok((movies, total))
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateMovieRequest,
    ) -> Result<Option<Movie>> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE movies SET updated_at = NOW()");

        if let Some(title) = &req.title {
            query.push(", title = ").push_bind(title);
        }
        if let Some(original_title) = &req.original_title {
            query.push(", original_title = ").push_bind(original_title);
        }
        if let Some(subtitle) = &req.subtitle {
            query.push(", subtitle = ").push_bind(subtitle);
        }
        if let Some(description) = &req.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(release_date) = req.release_date {
            query.push(", release_date = ").push_bind(release_date);
        }
        if let Some(duration) = req.duration {
            query.push(", duration = ").push_bind(duration);
        }
        if let Some(status) = &req.status {
            query.push(", status = ").push_bind(status);
        }
        if let Some(age_rating) = &req.age_rating {
            query.push(", age_rating = ").push_bind(age_rating);
        }
        if let Some(budget) = req.budget {
            query.push(", budget = ").push_bind(budget);
        }
        if let Some(revenue) = req.revenue {
            query.push(", revenue = ").push_bind(revenue);
        }
        if let Some(profit) = req.profit {
            query.push(", profit = ").push_bind(profit);
        }
        if let Some(trailer_url) = &req.trailer_url {
            query.push(", trailer_url = ").push_bind(trailer_url);
        }
        if let Some(genres) = &req.genres {
            query.push(", genres = ").push_bind(genres);
        }
        if let Some(companies) = &req.production_companies {
            query.push(", production_companies = ").push_bind(companies);
        }
        if let Some(languages) = &req.spoken_languages {
            query.push(", spoken_languages = ").push_bind(languages);
        }
        if let Some(vote_average) = req.vote_average {
            query.push(", vote_average = ").push_bind(vote_average);
        }
        if let Some(vote_count) = req.vote_count {
            query.push(", vote_count = ").push_bind(vote_count);
        }
        if let Some(popularity) = req.popularity {
            query.push(", popularity = ").push_bind(popularity);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING *");

        let movie = query.build_query_as::<Movie>().fetch_optional(pool).await?;
        Ok(movie)
    }

    pub async fn set_poster_url(pool: &PgPool, id: Uuid, poster_url: &str) -> Result<Movie> {
        let movie = sqlx::query_as::<_, Movie>(
            "UPDATE movies SET poster_url = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(poster_url)
        .fetch_one(pool)
        .await?;

        Ok(movie)
    }

    pub async fn set_backdrop_url(pool: &PgPool, id: Uuid, backdrop_url: &str) -> Result<Movie> {
        let movie = sqlx::query_as::<_, Movie>(
            "UPDATE movies SET backdrop_url = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(backdrop_url)
        .fetch_one(pool)
        .await?;

        Ok(movie)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn apply_filters<'a>(query: &mut QueryBuilder<'a, Postgres>, filters: &'a MovieFilters) {
        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            query.push(" AND (title ILIKE ").push_bind(pattern.clone());
            query.push(" OR description ILIKE ").push_bind(pattern);
            query.push(")");
        }
        if let Some(min) = filters.min_duration {
            query.push(" AND duration >= ").push_bind(min);
        }
        if let Some(max) = filters.max_duration {
            query.push(" AND duration <= ").push_bind(max);
        }
        if let Some(start) = filters.start_date {
            query.push(" AND release_date >= ").push_bind(start);
        }
        if let Some(end) = filters.end_date {
            query.push(" AND release_date <= ").push_bind(end);
        }
        if let Some(genre) = &filters.genre {
            query.push(" AND ").push_bind(genre).push(" = ANY(genres)");
        }
    }

    fn sort_column(sort_by: &str) -> &'static str {
        match sort_by {
            "title" => "title",
            "duration" => "duration",
            "popularity" => "popularity",
            "created_at" => "created_at",
            _ => "release_date",
        }
    }

    fn sort_direction(sort_order: &str) -> &'static str {
        if sort_order.eq_ignore_ascii_case("asc") {
            "ASC"
        } else {
            "DESC"
        }
    }
}
