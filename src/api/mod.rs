//! API handlers for Critica REST endpoints

pub mod auth;
pub mod comments;
pub mod health;
pub mod openapi;
pub mod reviews;
pub mod taxonomy;
pub mod titles;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Page of results
    pub items: Vec<T>,
    /// Total number of matching rows
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;
    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Authentication("Invalid authorization header format".to_string())
    })?;
    Ok(Some(token))
}

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Extractor for endpoints whose safe methods are open to anonymous callers.
/// A missing header yields no claims; a malformed or invalid token is still a
/// 401.
pub struct MaybeUser(pub Option<UserClaims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            None => Ok(MaybeUser(None)),
            Some(token) => {
                let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
                    .map_err(|e| AppError::Authentication(e.to_string()))?;
                Ok(MaybeUser(Some(claims)))
            }
        }
    }
}
