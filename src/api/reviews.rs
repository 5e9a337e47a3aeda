//! Review endpoints, nested under a title

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        review::{CreateReview, ReviewRead, UpdateReview},
        PageQuery,
    },
};

use super::{AuthenticatedUser, MaybeUser, PaginatedResponse};

/// List reviews of a title; open to anonymous callers
#[utoipa::path(
    get,
    path = "/titles/{title_id}/reviews/",
    tag = "reviews",
    params(
        ("title_id" = i32, Path, description = "Title ID"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("offset" = Option<i64>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "List of reviews", body = PaginatedResponse<ReviewRead>),
        (status = 404, description = "Title not found")
    )
)]
pub async fn list_reviews(
    State(state): State<crate::AppState>,
    _maybe_user: MaybeUser,
    Path(title_id): Path<i32>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<ReviewRead>>> {
    let (limit, offset) = page.bounds();
    let (reviews, total) = state
        .services
        .reviews
        .list_reviews(title_id, limit, offset)
        .await?;

    Ok(Json(PaginatedResponse {
        items: reviews.into_iter().map(ReviewRead::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// Get a single review
#[utoipa::path(
    get,
    path = "/titles/{title_id}/reviews/{review_id}/",
    tag = "reviews",
    params(
        ("title_id" = i32, Path, description = "Title ID"),
        ("review_id" = i32, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review details", body = ReviewRead),
        (status = 404, description = "Title or review not found")
    )
)]
pub async fn get_review(
    State(state): State<crate::AppState>,
    _maybe_user: MaybeUser,
    Path((title_id, review_id)): Path<(i32, i32)>,
) -> AppResult<Json<ReviewRead>> {
    let review = state.services.reviews.get_review(title_id, review_id).await?;
    Ok(Json(ReviewRead::from(review)))
}

/// Create a review; one per (title, author)
#[utoipa::path(
    post,
    path = "/titles/{title_id}/reviews/",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("title_id" = i32, Path, description = "Title ID")),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = ReviewRead),
        (status = 400, description = "Duplicate review or invalid score"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Title not found")
    )
)]
pub async fn create_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(title_id): Path<i32>,
    Json(review): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<ReviewRead>)> {
    review.validate()?;

    let created = state
        .services
        .reviews
        .create_review(title_id, claims.user_id, review)
        .await?;
    Ok((StatusCode::CREATED, Json(ReviewRead::from(created))))
}

/// Update a review (author, moderator or admin)
#[utoipa::path(
    patch,
    path = "/titles/{title_id}/reviews/{review_id}/",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("title_id" = i32, Path, description = "Title ID"),
        ("review_id" = i32, Path, description = "Review ID")
    ),
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = ReviewRead),
        (status = 403, description = "Not the author, a moderator or an admin"),
        (status = 404, description = "Title or review not found")
    )
)]
pub async fn update_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((title_id, review_id)): Path<(i32, i32)>,
    Json(update): Json<UpdateReview>,
) -> AppResult<Json<ReviewRead>> {
    update.validate()?;

    let review = state.services.reviews.get_review(title_id, review_id).await?;
    claims.require_author_or_moderator(review.author_id)?;

    let updated = state
        .services
        .reviews
        .update_review(title_id, review_id, update)
        .await?;
    Ok(Json(ReviewRead::from(updated)))
}

/// Delete a review (author, moderator or admin); comments cascade
#[utoipa::path(
    delete,
    path = "/titles/{title_id}/reviews/{review_id}/",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("title_id" = i32, Path, description = "Title ID"),
        ("review_id" = i32, Path, description = "Review ID")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Not the author, a moderator or an admin"),
        (status = 404, description = "Title or review not found")
    )
)]
pub async fn delete_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((title_id, review_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    let review = state.services.reviews.get_review(title_id, review_id).await?;
    claims.require_author_or_moderator(review.author_id)?;

    state
        .services
        .reviews
        .delete_review(title_id, review_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
