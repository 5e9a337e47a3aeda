//! Category and genre endpoints: list, create and delete only

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::taxonomy::{Category, CreateTagged, Genre, TaggedQuery},
};

use super::{AuthenticatedUser, MaybeUser, PaginatedResponse};

/// List categories with name search; open to anonymous callers
#[utoipa::path(
    get,
    path = "/categories/",
    tag = "categories",
    params(
        ("search" = Option<String>, Query, description = "Substring match on name"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("offset" = Option<i64>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "List of categories", body = PaginatedResponse<Category>)
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    _maybe_user: MaybeUser,
    Query(query): Query<TaggedQuery>,
) -> AppResult<Json<PaginatedResponse<Category>>> {
    let (limit, offset) = crate::models::page_bounds(query.limit, query.offset);
    let (categories, total) = state.services.catalog.list_categories(&query).await?;

    Ok(Json(PaginatedResponse {
        items: categories,
        total,
        limit,
        offset,
    }))
}

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/categories/",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CreateTagged,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid input or duplicate slug"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(tagged): Json<CreateTagged>,
) -> AppResult<(StatusCode, Json<Category>)> {
    claims.require_admin()?;
    tagged.validate()?;

    let created = state.services.catalog.create_category(tagged).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a category by slug (admin only); titles keep a null category
#[utoipa::path(
    delete,
    path = "/categories/{slug}/",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.catalog.delete_category(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List genres with name search; open to anonymous callers
#[utoipa::path(
    get,
    path = "/genres/",
    tag = "genres",
    params(
        ("search" = Option<String>, Query, description = "Substring match on name"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("offset" = Option<i64>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "List of genres", body = PaginatedResponse<Genre>)
    )
)]
pub async fn list_genres(
    State(state): State<crate::AppState>,
    _maybe_user: MaybeUser,
    Query(query): Query<TaggedQuery>,
) -> AppResult<Json<PaginatedResponse<Genre>>> {
    let (limit, offset) = crate::models::page_bounds(query.limit, query.offset);
    let (genres, total) = state.services.catalog.list_genres(&query).await?;

    Ok(Json(PaginatedResponse {
        items: genres,
        total,
        limit,
        offset,
    }))
}

/// Create a genre (admin only)
#[utoipa::path(
    post,
    path = "/genres/",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = CreateTagged,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid input or duplicate slug"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(tagged): Json<CreateTagged>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require_admin()?;
    tagged.validate()?;

    let created = state.services.catalog.create_genre(tagged).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a genre by slug (admin only)
#[utoipa::path(
    delete,
    path = "/genres/{slug}/",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Genre slug")),
    responses(
        (status = 204, description = "Genre deleted"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn delete_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.catalog.delete_genre(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
