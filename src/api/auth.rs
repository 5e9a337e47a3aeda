//! Registration and token endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{SignupRequest, SignupResponse, TokenRequest, TokenResponse},
};

/// Register an (email, username) pair and mail a one-time access code
#[utoipa::path(
    post,
    path = "/auth/signup/",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Access code issued and mailed", body = SignupResponse),
        (status = 400, description = "Validation conflict", body = crate::error::ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    Json(request): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    request.validate()?;

    let user = state.services.users.signup(&request).await?;
    Ok(Json(SignupResponse {
        email: user.email,
        username: user.username,
    }))
}

/// Exchange (username, access code) for a bearer token
#[utoipa::path(
    post,
    path = "/auth/token/",
    tag = "auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Bearer token", body = TokenResponse),
        (status = 400, description = "Incorrect access code", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown user", body = crate::error::ErrorResponse)
    )
)]
pub async fn obtain_token(
    State(state): State<crate::AppState>,
    Json(request): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    request.validate()?;

    let access = state.services.users.login(&request).await?;
    Ok(Json(TokenResponse { access }))
}
