//! Bearer-authenticated user endpoints.

use crate::{
    error::HttpError,
    models::user::{TokenResponse, User},
    AppError, AppState,
};
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};

/// Pull the credential out of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let scheme = value.get(..7)?;
    if !scheme.eq_ignore_ascii_case("bearer ") {
        return None;
    }
    Some(value[7..].trim()).filter(|token| !token.is_empty())
}

fn require_token(headers: &HeaderMap) -> Result<&str, AppError> {
    extract_bearer_token(headers).ok_or(AppError::Forbidden)
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("Unauthorized".to_string())
}

/// Return the user owning the bearer token.
///
/// # Errors
/// 403 without a usable bearer credential, 401 when the token is unknown.
pub async fn get_self(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<User>, HttpError> {
    let token = require_token(&headers)?;
    let user = state
        .db
        .users
        .get_by_token(token)?
        .ok_or_else(unauthorized)?;
    Ok(Json(user))
}

/// Replace the caller's bearer token.
///
/// The presented token stops working as soon as this returns.
pub async fn regenerate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, HttpError> {
    let token = require_token(&headers)?;
    let fresh = state
        .db
        .users
        .regenerate_token(token)?
        .ok_or_else(unauthorized)?;
    tracing::info!("Regenerated user token");
    Ok(Json(TokenResponse { token: fresh }))
}

#[cfg(test)]
mod tests {
    use super::extract_bearer_token;
    use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("BEARER abc")), Some("abc"));
    }

    #[test]
    fn malformed_credentials_are_ignored() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
        assert_eq!(extract_bearer_token(&headers("Basic abc")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer    ")), None);
    }
}
