use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::handler::register,
        crate::modules::auth::handler::login,
        crate::modules::auth::handler::logout,
        crate::modules::auth::handler::refresh,
        crate::modules::auth::handler::get_me,
        crate::modules::users::handler::create_user,
        crate::modules::users::handler::list_users,
        crate::modules::users::handler::get_user,
        crate::modules::users::handler::update_user,
        crate::modules::users::handler::update_password,
        crate::modules::users::handler::delete_user,
        crate::modules::movies::handler::create_movie,
        crate::modules::movies::handler::list_movies,
        crate::modules::movies::handler::get_movie,
        crate::modules::movies::handler::update_movie,
        crate::modules::movies::handler::delete_movie,
        crate::modules::movies::handler::upload_poster,
        crate::modules::movies::handler::upload_backdrop,
        crate::modules::health::handler::health_check,
    ),
    components(
        schemas(
            crate::modules::auth::dto::RegisterRequest,
            crate::modules::auth::dto::LoginRequest,
            crate::modules::auth::dto::AuthResponse,
            crate::modules::users::dto::CreateUserRequest,
            crate::modules::users::dto::UpdateUserRequest,
            crate::modules::users::dto::UpdatePasswordRequest,
            crate::modules::users::dto::UserResponse,
            crate::modules::movies::dto::CreateMovieRequest,
            crate::modules::movies::dto::UpdateMovieRequest,
            crate::modules::movies::dto::MovieResponse,
            crate::modules::movies::dto::MovieListResponse,
            crate::modules::movies::dto::PaginationMeta,
            crate::modules::movies::model::Movie,
            crate::modules::health::handler::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Users", description = "User account management"),
        (name = "Movies", description = "Movie collection management"),
        (name = "Health", description = "Service health")
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
