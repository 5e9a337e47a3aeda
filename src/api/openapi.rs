//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, comments, health, reviews, taxonomy, titles, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Critica API",
        version = "1.0.0",
        description = "Content Review Platform REST API",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::obtain_token,
        // Users
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::get_me,
        users::update_me,
        // Titles
        titles::list_titles,
        titles::get_title,
        titles::create_title,
        titles::update_title,
        titles::delete_title,
        // Reviews
        reviews::list_reviews,
        reviews::get_review,
        reviews::create_review,
        reviews::update_review,
        reviews::delete_review,
        // Comments
        comments::list_comments,
        comments::get_comment,
        comments::create_comment,
        comments::update_comment,
        comments::delete_comment,
        // Categories & genres
        taxonomy::list_categories,
        taxonomy::create_category,
        taxonomy::delete_category,
        taxonomy::list_genres,
        taxonomy::create_genre,
        taxonomy::delete_genre,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::SignupRequest,
            crate::models::user::SignupResponse,
            crate::models::user::TokenRequest,
            crate::models::user::TokenResponse,
            // Users
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateProfile,
            // Titles
            crate::models::title::TitleRead,
            crate::models::title::CreateTitle,
            crate::models::title::UpdateTitle,
            // Reviews & comments
            crate::models::review::ReviewRead,
            crate::models::review::CreateReview,
            crate::models::review::UpdateReview,
            crate::models::comment::CommentRead,
            crate::models::comment::CreateComment,
            crate::models::comment::UpdateComment,
            // Categories & genres
            crate::models::taxonomy::Category,
            crate::models::taxonomy::Genre,
            crate::models::taxonomy::CreateTagged,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and token endpoints"),
        (name = "users", description = "User management"),
        (name = "titles", description = "Title catalog"),
        (name = "reviews", description = "Reviews on titles"),
        (name = "comments", description = "Comments on reviews"),
        (name = "categories", description = "Category reference data"),
        (name = "genres", description = "Genre reference data")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
