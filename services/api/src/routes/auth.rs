//! Registration, login and profile routes

use ::auth::models::{LoginCredentials, RegisterRequest};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::ApiResult,
    middleware::AuthUser,
    models::{LoginResponse, RegisterResponse},
    state::AppState,
};

/// Create an account
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let user = state.auth.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: user.summary(),
        }),
    ))
}

/// Exchange credentials for a session token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginCredentials>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(payload) = payload?;
    let outcome = state.auth.login(payload).await?;

    Ok(Json(LoginResponse {
        token: outcome.token.token,
        token_type: "Bearer".to_string(),
        expires_at: outcome.token.expires_at,
        user: outcome.user,
    }))
}

/// Profile of the caller
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let profile = state.auth.profile(user.id).await?;
    Ok(Json(profile))
}
