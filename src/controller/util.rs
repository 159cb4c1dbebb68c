use axum::http::HeaderMap;

use crate::error::{auth::AuthError, Error};

/// Per-browser identifier header sent by the frontend with login requests.
pub static BROWSER_TOKEN_HEADER: &str = "x-browser-token";

/// Extracts the bearer session token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidSession.into())
}

/// Extracts the per-browser identifier header, if present.
pub fn browser_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(BROWSER_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
}
