use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{error::InternalServerError, model::api::ErrorDto, model::scope::ScopeSet};

/// Login and session errors.
///
/// The original flow collapsed "token exchange failed" and "granted scopes
/// insufficient" into one kind; they are kept distinct here so callers can
/// tell a provider outage from a misconfigured application.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No authorization code was supplied with the login request.
    #[error("Missing authorization code")]
    MissingCode,
    /// The provider reported the authorization code as already consumed or
    /// revoked.
    #[error("Authorization code was revoked or already used")]
    InvalidCode,
    /// The token exchange produced no usable grant for any other reason
    /// (network failure, non-2xx response, malformed payload).
    #[error("Token exchange with the identity provider failed")]
    TokenExchangeFailed,
    /// The provider granted fewer scopes than the deployment requires.
    #[error("Granted scopes are missing required scopes: {missing}")]
    InvalidScopes { missing: ScopeSet },
    /// The user carries an active suspension or the provider's reserved
    /// unrated status code.
    #[error("User {0} is suspended or unrated")]
    UserSuspended(i32),
    /// The browser identifier header was absent or the session row could
    /// not be replaced.
    #[error("Failed to create session: {0}")]
    SessionCreation(String),
    /// No live session matches the presented session token.
    #[error("Session token is not valid")]
    InvalidSession,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingCode | Self::InvalidCode | Self::InvalidScopes { .. } => {
                tracing::debug!("{}", self);

                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorDto {
                        error: "There was an issue logging you in, please try again.".to_string(),
                    }),
                )
                    .into_response()
            }
            Self::UserSuspended(_) => {
                tracing::debug!("{}", self);

                (
                    StatusCode::FORBIDDEN,
                    Json(ErrorDto {
                        error: "Your account is suspended.".to_string(),
                    }),
                )
                    .into_response()
            }
            Self::InvalidSession => {
                tracing::debug!("{}", self);

                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorDto {
                        error: "Not authenticated".to_string(),
                    }),
                )
                    .into_response()
            }
            Self::TokenExchangeFailed | Self::SessionCreation(_) => {
                InternalServerError(self).into_response()
            }
        }
    }
}
