//! Authentication middleware
//!
//! Every protected handler takes an [`AuthUser`]. Extracting it reads the
//! `x-auth-token` header and verifies it with the pre-computed keys held
//! in `AppState`; the request is rejected before the handler body runs
//! when the token is missing or fails verification. Storage is never
//! touched here.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{request::Parts, HeaderMap},
};
use content_hub_shared::AuthError;
use tracing::debug;
use uuid::Uuid;

use super::JwtService;

/// Header carrying the identity token
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated user extracted from the identity token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Resolve the request identity from its headers
pub fn authenticate(headers: &HeaderMap, jwt: &JwtService) -> Result<AuthUser, AuthError> {
    let token = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let user_id = jwt.verify_user(token).map_err(|kind| {
        debug!(reason = %kind, "Rejected identity token");
        AuthError::InvalidToken(kind)
    })?;

    Ok(AuthUser { user_id })
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        Ok(authenticate(&parts.headers, app_state.jwt())?)
    }
}
