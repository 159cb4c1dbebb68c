//! Delivery queue error types.
//!
//! These errors cover job payload serialization and queue bookkeeping. They
//! indicate bugs or infrastructure problems rather than client mistakes, so
//! every variant maps to a 500 response.

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::error::InternalServerError;

#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Failed to serialize or deserialize a job payload.
    ///
    /// A deserialization failure on a stored row means the row was written
    /// by an incompatible version or corrupted; the job is dead-lettered
    /// rather than retried.
    #[error("Failed to serialize/deserialize delivery job payload: {0}")]
    Serialization(String),
}

impl IntoResponse for DeliveryError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
