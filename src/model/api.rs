//! API request and response DTOs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// Body for `POST /api/auth/login`.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// One-time authorization code from the VATSIM Connect redirect.
    pub code: String,
    /// Whether to issue a long-lived session.
    #[serde(default)]
    pub remember: bool,
}

/// Successful login response.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Opaque session token bound to the calling browser.
    pub token: String,
    pub user: UserDto,
}

/// Reconciled user record returned after login or refresh.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub cid: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rating: i32,
    pub pilot_rating: i32,
    pub division_code: String,
    pub subdivision_code: Option<String>,
    pub language: String,
}

impl UserDto {
    /// Assembles the API view of a user from its identity, profile snapshot
    /// and settings rows.
    pub fn from_records(
        user: entity::user::Model,
        profile: entity::user_profile::Model,
        settings: entity::user_settings::Model,
    ) -> Self {
        Self {
            cid: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            rating: profile.rating,
            pilot_rating: profile.pilot_rating,
            division_code: profile.division_code,
            subdivision_code: profile.subdivision_code,
            language: settings.language,
        }
    }
}

/// Body for `POST /api/solos`.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateSoloRequest {
    pub user_cid: i32,
    pub instructor_cid: i32,
    pub position: String,
    pub expires_at: NaiveDateTime,
}

/// Solo authorization as returned by the administrative endpoints.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct SoloDto {
    pub id: i32,
    pub user_cid: i32,
    pub instructor_cid: i32,
    pub position: String,
    pub expires_at: NaiveDateTime,
    /// Remote identifier, present once the record has synchronized.
    pub vateud_solo_id: Option<String>,
}

impl From<entity::solo_authorization::Model> for SoloDto {
    fn from(model: entity::solo_authorization::Model) -> Self {
        Self {
            id: model.id,
            user_cid: model.user_id,
            instructor_cid: model.instructor_id,
            position: model.position,
            expires_at: model.expires_at,
            vateud_solo_id: model.vateud_solo_id,
        }
    }
}

/// Terminal delivery job surfaced to operators.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct DeadLetterDto {
    pub id: i32,
    pub kind: String,
    pub correlation_id: i32,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub failed_at: Option<NaiveDateTime>,
}

impl From<entity::delivery_job::Model> for DeadLetterDto {
    fn from(model: entity::delivery_job::Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            correlation_id: model.correlation_id,
            attempts: model.attempts,
            last_error: model.last_error,
            failed_at: model.failed_at,
        }
    }
}
