use crate::api::AppState;
use crate::auth::session::AuthClaims;
use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Authenticated request identity; extraction fails with 401 when the bearer
/// token is missing, unknown, or expired
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthClaims);

/// Optional identity for endpoints that allow anonymous callers
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthClaims>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Authentication("Missing bearer token".to_string()))?;

        let claims = state
            .auth
            .sessions()
            .resolve(token)
            .ok_or_else(|| AppError::Authentication("Invalid or expired token".to_string()))?;

        Ok(CurrentUser(claims))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_token(parts).and_then(|token| state.auth.sessions().resolve(token));
        Ok(MaybeUser(claims))
    }
}
