use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

/// Legacy header some clients send the raw token in.
pub const TOKEN_HEADER: &str = "token";

/// Identity of the caller, resolved from a signed token before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        // Every failure collapses into the same rejection.
        let user_id = state.jwt.verify(token).ok_or(AppError::Unauthorized)?;
        Ok(AuthUser { user_id })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?.trim();
        return (!token.is_empty()).then_some(token);
    }

    let token = headers.get(TOKEN_HEADER)?.to_str().ok()?.trim();
    (!token.is_empty()).then_some(token)
}
