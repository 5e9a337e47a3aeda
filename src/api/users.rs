//! User management endpoints (admin) and the self-service profile

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateProfile, UpdateUser, User, UserQuery},
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List users with username search and pagination (admin only)
#[utoipa::path(
    get,
    path = "/users/",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("search" = Option<String>, Query, description = "Substring match on username"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("offset" = Option<i64>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "List of users", body = PaginatedResponse<User>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<PaginatedResponse<User>>> {
    claims.require_admin()?;

    let (limit, offset) = crate::models::page_bounds(query.limit, query.offset);
    let (users, total) = state.services.users.search_users(&query).await?;

    Ok(Json(PaginatedResponse {
        items: users,
        total,
        limit,
        offset,
    }))
}

/// Create a new user (admin only)
#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input or duplicate username/email"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    claims.require_admin()?;
    user.validate()?;

    let created = state.services.users.create_user(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get user details by username (admin only)
#[utoipa::path(
    get,
    path = "/users/{username}/",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(username): Path<String>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;

    let user = state.services.users.get_by_username(&username).await?;
    Ok(Json(user))
}

/// Update a user (admin only; role is writable here)
#[utoipa::path(
    patch,
    path = "/users/{username}/",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "Username")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(username): Path<String>,
    Json(update): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;
    update.validate()?;

    let updated = state.services.users.update_user(&username, update).await?;
    Ok(Json(updated))
}

/// Delete a user (admin only)
#[utoipa::path(
    delete,
    path = "/users/{username}/",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.users.delete_user(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get own profile
#[utoipa::path(
    get,
    path = "/users/me/",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}

/// Update own profile. The request shape carries no role field, so the role
/// cannot be self-escalated.
#[utoipa::path(
    patch,
    path = "/users/me/",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(profile): Json<UpdateProfile>,
) -> AppResult<Json<User>> {
    profile.validate()?;

    let updated = state
        .services
        .users
        .update_profile(claims.user_id, profile)
        .await?;
    Ok(Json(updated))
}
