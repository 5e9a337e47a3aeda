//! Critica Server - Content Review Platform
//!
//! REST API server for registering users, cataloging titles and collecting
//! scored reviews with threaded comments.

use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use critica_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("critica_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Critica Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), config.email.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes; trailing slashes follow the public contract
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/signup/", post(api::auth::signup))
        .route("/auth/token/", post(api::auth::obtain_token))
        // Users (admin) and self profile
        .route("/users/", get(api::users::list_users).post(api::users::create_user))
        .route("/users/me/", get(api::users::get_me).patch(api::users::update_me))
        .route(
            "/users/:username/",
            get(api::users::get_user)
                .patch(api::users::update_user)
                .delete(api::users::delete_user),
        )
        // Titles
        .route("/titles/", get(api::titles::list_titles).post(api::titles::create_title))
        .route(
            "/titles/:title_id/",
            get(api::titles::get_title)
                .patch(api::titles::update_title)
                .delete(api::titles::delete_title),
        )
        // Reviews
        .route(
            "/titles/:title_id/reviews/",
            get(api::reviews::list_reviews).post(api::reviews::create_review),
        )
        .route(
            "/titles/:title_id/reviews/:review_id/",
            get(api::reviews::get_review)
                .patch(api::reviews::update_review)
                .delete(api::reviews::delete_review),
        )
        // Comments
        .route(
            "/titles/:title_id/reviews/:review_id/comments/",
            get(api::comments::list_comments).post(api::comments::create_comment),
        )
        .route(
            "/titles/:title_id/reviews/:review_id/comments/:comment_id/",
            get(api::comments::get_comment)
                .patch(api::comments::update_comment)
                .delete(api::comments::delete_comment),
        )
        // Categories
        .route(
            "/categories/",
            get(api::taxonomy::list_categories).post(api::taxonomy::create_category),
        )
        .route("/categories/:slug/", delete(api::taxonomy::delete_category))
        // Genres
        .route(
            "/genres/",
            get(api::taxonomy::list_genres).post(api::taxonomy::create_genre),
        )
        .route("/genres/:slug/", delete(api::taxonomy::delete_genre))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
