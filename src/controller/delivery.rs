use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    error::Error,
    model::{
        api::{DeadLetterDto, ErrorDto},
        app::AppState,
    },
    service::delivery::DeliveryService,
};

pub static DELIVERY_TAG: &str = "delivery";

/// List delivery jobs that exhausted their retries
///
/// Dead letters are never replayed automatically; this endpoint exists so
/// an operator can inspect and resolve them.
///
/// # Responses
/// - 200 (OK): Returns all dead-lettered jobs, oldest first
/// - 500 (Internal Server Error): Database error
#[utoipa::path(
    get,
    path = "/api/delivery/dead-letter",
    tag = DELIVERY_TAG,
    responses(
        (status = 200, description = "Dead-lettered delivery jobs", body = Vec<DeadLetterDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_dead_letters(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let dead = DeliveryService::new(&state.db, &state.vateud)
        .dead_letters()
        .await?;

    let dtos: Vec<DeadLetterDto> = dead.into_iter().map(DeadLetterDto::from).collect();

    Ok((StatusCode::OK, Json(dtos)))
}
