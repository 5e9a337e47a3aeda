//! Comment endpoints, nested under a (title, review) pair

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        comment::{CommentRead, CreateComment, UpdateComment},
        PageQuery,
    },
};

use super::{AuthenticatedUser, MaybeUser, PaginatedResponse};

/// List comments of a review; open to anonymous callers
#[utoipa::path(
    get,
    path = "/titles/{title_id}/reviews/{review_id}/comments/",
    tag = "comments",
    params(
        ("title_id" = i32, Path, description = "Title ID"),
        ("review_id" = i32, Path, description = "Review ID"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("offset" = Option<i64>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "List of comments", body = PaginatedResponse<CommentRead>),
        (status = 404, description = "Title or review not found")
    )
)]
pub async fn list_comments(
    State(state): State<crate::AppState>,
    _maybe_user: MaybeUser,
    Path((title_id, review_id)): Path<(i32, i32)>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<CommentRead>>> {
    let (limit, offset) = page.bounds();
    let (comments, total) = state
        .services
        .reviews
        .list_comments(title_id, review_id, limit, offset)
        .await?;

    Ok(Json(PaginatedResponse {
        items: comments.into_iter().map(CommentRead::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// Get a single comment
#[utoipa::path(
    get,
    path = "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/",
    tag = "comments",
    params(
        ("title_id" = i32, Path, description = "Title ID"),
        ("review_id" = i32, Path, description = "Review ID"),
        ("comment_id" = i32, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment details", body = CommentRead),
        (status = 404, description = "Parent or comment not found")
    )
)]
pub async fn get_comment(
    State(state): State<crate::AppState>,
    _maybe_user: MaybeUser,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
) -> AppResult<Json<CommentRead>> {
    let comment = state
        .services
        .reviews
        .get_comment(title_id, review_id, comment_id)
        .await?;
    Ok(Json(CommentRead::from(comment)))
}

/// Create a comment on a review
#[utoipa::path(
    post,
    path = "/titles/{title_id}/reviews/{review_id}/comments/",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(
        ("title_id" = i32, Path, description = "Title ID"),
        ("review_id" = i32, Path, description = "Review ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment created", body = CommentRead),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Title or review not found")
    )
)]
pub async fn create_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((title_id, review_id)): Path<(i32, i32)>,
    Json(comment): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<CommentRead>)> {
    comment.validate()?;

    let created = state
        .services
        .reviews
        .create_comment(title_id, review_id, claims.user_id, comment)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentRead::from(created))))
}

/// Update a comment (author, moderator or admin)
#[utoipa::path(
    patch,
    path = "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(
        ("title_id" = i32, Path, description = "Title ID"),
        ("review_id" = i32, Path, description = "Review ID"),
        ("comment_id" = i32, Path, description = "Comment ID")
    ),
    request_body = UpdateComment,
    responses(
        (status = 200, description = "Comment updated", body = CommentRead),
        (status = 403, description = "Not the author, a moderator or an admin"),
        (status = 404, description = "Parent or comment not found")
    )
)]
pub async fn update_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
    Json(update): Json<UpdateComment>,
) -> AppResult<Json<CommentRead>> {
    update.validate()?;

    let comment = state
        .services
        .reviews
        .get_comment(title_id, review_id, comment_id)
        .await?;
    claims.require_author_or_moderator(comment.author_id)?;

    let updated = state
        .services
        .reviews
        .update_comment(title_id, review_id, comment_id, update)
        .await?;
    Ok(Json(CommentRead::from(updated)))
}

/// Delete a comment (author, moderator or admin)
#[utoipa::path(
    delete,
    path = "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(
        ("title_id" = i32, Path, description = "Title ID"),
        ("review_id" = i32, Path, description = "Review ID"),
        ("comment_id" = i32, Path, description = "Comment ID")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author, a moderator or an admin"),
        (status = 404, description = "Parent or comment not found")
    )
)]
pub async fn delete_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
) -> AppResult<StatusCode> {
    let comment = state
        .services
        .reviews
        .get_comment(title_id, review_id, comment_id)
        .await?;
    claims.require_author_or_moderator(comment.author_id)?;

    state
        .services
        .reviews
        .delete_comment(title_id, review_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
