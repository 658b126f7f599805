//! Request guards: bearer token authentication and origin filtering

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Authentication middleware
///
/// Rejects the request with 401 unless it carries a valid
/// `Authorization: Bearer <token>` header, then exposes the caller as an
/// [`AuthUser`] extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|rejection| {
        debug!("Rejected authorization header: {}", rejection);
        ApiError::Unauthorized("Missing or invalid authorization header".to_string())
    })?;

    let id = state.auth.verify_token(bearer.token()).map_err(|err| {
        debug!("Rejected bearer token: {}", err);
        ApiError::from(err)
    })?;

    req.extensions_mut().insert(AuthUser { id });

    Ok(next.run(req).await)
}

/// Reject browser requests from origins outside the CORS policy
pub async fn origin_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        let origin = origin.to_str().unwrap_or_default();
        if !state.origins.allows(origin) {
            warn!("Blocked request from origin {}", origin);
            return Err(ApiError::Forbidden(format!("Origin not allowed: {}", origin)));
        }
    }

    Ok(next.run(req).await)
}
