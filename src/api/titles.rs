//! Title endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::title::{CreateTitle, TitleQuery, TitleRead, UpdateTitle},
};

use super::{AuthenticatedUser, MaybeUser, PaginatedResponse};

/// List titles with filters and pagination; open to anonymous callers
#[utoipa::path(
    get,
    path = "/titles/",
    tag = "titles",
    params(
        ("name" = Option<String>, Query, description = "Substring match on name"),
        ("category" = Option<String>, Query, description = "Category slug"),
        ("genre" = Option<String>, Query, description = "Genre slug"),
        ("year" = Option<i32>, Query, description = "Release year"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("offset" = Option<i64>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "List of titles", body = PaginatedResponse<TitleRead>)
    )
)]
pub async fn list_titles(
    State(state): State<crate::AppState>,
    _maybe_user: MaybeUser,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<PaginatedResponse<TitleRead>>> {
    let (limit, offset) = crate::models::page_bounds(query.limit, query.offset);
    let (titles, total) = state.services.catalog.search_titles(&query).await?;

    Ok(Json(PaginatedResponse {
        items: titles,
        total,
        limit,
        offset,
    }))
}

/// Get a title with nested category/genres and the derived rating
#[utoipa::path(
    get,
    path = "/titles/{title_id}/",
    tag = "titles",
    params(("title_id" = i32, Path, description = "Title ID")),
    responses(
        (status = 200, description = "Title details", body = TitleRead),
        (status = 404, description = "Title not found")
    )
)]
pub async fn get_title(
    State(state): State<crate::AppState>,
    _maybe_user: MaybeUser,
    Path(title_id): Path<i32>,
) -> AppResult<Json<TitleRead>> {
    let title = state.services.catalog.get_title(title_id).await?;
    Ok(Json(title))
}

/// Create a title (admin only); category and genres referenced by slug
#[utoipa::path(
    post,
    path = "/titles/",
    tag = "titles",
    security(("bearer_auth" = [])),
    request_body = CreateTitle,
    responses(
        (status = 201, description = "Title created", body = TitleRead),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_title(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(title): Json<CreateTitle>,
) -> AppResult<(StatusCode, Json<TitleRead>)> {
    claims.require_admin()?;
    title.validate()?;

    let created = state.services.catalog.create_title(title).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a title (admin only)
#[utoipa::path(
    patch,
    path = "/titles/{title_id}/",
    tag = "titles",
    security(("bearer_auth" = [])),
    params(("title_id" = i32, Path, description = "Title ID")),
    request_body = UpdateTitle,
    responses(
        (status = 200, description = "Title updated", body = TitleRead),
        (status = 404, description = "Title not found")
    )
)]
pub async fn update_title(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(title_id): Path<i32>,
    Json(update): Json<UpdateTitle>,
) -> AppResult<Json<TitleRead>> {
    claims.require_admin()?;
    update.validate()?;

    let updated = state.services.catalog.update_title(title_id, update).await?;
    Ok(Json(updated))
}

/// Delete a title; its reviews and their comments cascade (admin only)
#[utoipa::path(
    delete,
    path = "/titles/{title_id}/",
    tag = "titles",
    security(("bearer_auth" = [])),
    params(("title_id" = i32, Path, description = "Title ID")),
    responses(
        (status = 204, description = "Title deleted"),
        (status = 404, description = "Title not found")
    )
)]
pub async fn delete_title(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(title_id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.catalog.delete_title(title_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
