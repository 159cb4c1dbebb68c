//! Error types for the trainingcenter server.
//!
//! Domain-specific error enums (authentication, configuration, delivery)
//! are aggregated into a single [`Error`] type via `thiserror`'s `#[from]`
//! conversions. All errors implement `IntoResponse` so handlers can bubble
//! them straight out of axum routes.

pub mod auth;
pub mod config;
pub mod delivery;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    error::{auth::AuthError, config::ConfigError, delivery::DeliveryError},
    model::api::ErrorDto,
};

/// Main error type for the trainingcenter server.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication error (login flow, sessions, suspension).
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Delivery queue error (payload serialization, job bookkeeping).
    #[error(transparent)]
    DeliveryError(#[from] DeliveryError),
    /// The provider returned no usable profile document; the login or
    /// refresh attempt must abort rather than continue with partial data.
    #[error("Identity provider returned no profile data")]
    MissingProfileData,
    /// A referenced record does not exist.
    #[error("{0} not found")]
    NotFound(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Failure constructing an outbound HTTP client.
    #[error(transparent)]
    HttpClient(#[from] reqwest::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// I/O error binding or serving the HTTP listener.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Flattens a SeaORM transaction error into the application error type.
    pub fn from_transaction(err: sea_orm::TransactionError<Error>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(e) => Self::DbErr(e),
            sea_orm::TransactionError::Transaction(e) => e,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::DeliveryError(err) => err.into_response(),
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(ErrorDto {
                    error: format!("{} not found", what),
                }),
            )
                .into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper converting any displayable error into a 500 response.
///
/// The full error is logged server-side; the client only sees a generic
/// message so internal details never leak.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
