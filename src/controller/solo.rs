use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::Error,
    model::{
        api::{CreateSoloRequest, ErrorDto, SoloDto},
        app::AppState,
    },
    service::solo::SoloService,
};

pub static SOLO_TAG: &str = "solo";

/// Create a solo authorization
///
/// The local record is created immediately; mirroring to VATEUD happens
/// inline when possible and through the delivery queue otherwise.
///
/// # Responses
/// - 201 (Created): Returns the created record, with the remote id when the
///   inline sync succeeded
/// - 500 (Internal Server Error): Database error
#[utoipa::path(
    post,
    path = "/api/solos",
    tag = SOLO_TAG,
    request_body = CreateSoloRequest,
    responses(
        (status = 201, description = "Solo authorization created", body = SoloDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_solo(
    State(state): State<AppState>,
    Json(body): Json<CreateSoloRequest>,
) -> Result<impl IntoResponse, Error> {
    let service = SoloService::new(&state.db, &state.vateud);

    let solo = service
        .create_solo(body.user_cid, body.instructor_cid, &body.position, body.expires_at)
        .await?;

    Ok((StatusCode::CREATED, Json(SoloDto::from(solo))))
}

/// Remove a solo authorization
///
/// Deletes the local record and mirrors the removal to VATEUD, cancelling
/// any still-pending create job for the same record.
///
/// # Responses
/// - 204 (No Content): Solo authorization removed
/// - 404 (Not Found): No solo authorization with this id
/// - 500 (Internal Server Error): Database error
#[utoipa::path(
    delete,
    path = "/api/solos/{id}",
    tag = SOLO_TAG,
    params(
        ("id" = i32, Path, description = "Local solo authorization id")
    ),
    responses(
        (status = 204, description = "Solo authorization removed"),
        (status = 404, description = "Solo authorization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_solo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    SoloService::new(&state.db, &state.vateud)
        .remove_solo(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
