//! Bearer-token authentication: password hashing, JWT issue/verify, and the
//! `AuthUser` extractor that guards every protected route.

mod jwt;
mod password;

pub use jwt::{Claims, JwtKeys, TokenError};
pub use password::{hash_password, verify_password};

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// The authenticated caller, resolved from the bearer token's subject.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Pulls the raw token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(TokenError::Missing)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(TokenError::Malformed)?;

    if token.is_empty() {
        return Err(TokenError::Malformed);
    }
    Ok(token)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user_id = state.jwt.verify(token)?;

        let user = state
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".to_string()))?;

        Ok(AuthUser(user))
    }
}
