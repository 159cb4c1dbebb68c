use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};

use crate::{
    controller::util,
    data::{profile::ProfileRepository, settings::SettingsRepository},
    error::Error,
    model::{
        api::{ErrorDto, LoginRequest, LoginResponse, UserDto},
        app::AppState,
    },
    service::auth::{login::LoginService, session::SessionService},
};

pub static AUTH_TAG: &str = "auth";

/// Log in with a VATSIM Connect authorization code
///
/// Exchanges the code, reconciles the local identity and replaces the
/// session for the calling browser. The browser is identified by the
/// `x-browser-token` header.
///
/// # Responses
/// - 200 (OK): Logged in, returns the session token and user record
/// - 400 (Bad Request): Missing or invalid code, or insufficient scopes
/// - 403 (Forbidden): The account is suspended
/// - 500 (Internal Server Error): Provider outage or database error
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = LoginResponse),
        (status = 400, description = "Invalid code or insufficient scopes", body = ErrorDto),
        (status = 403, description = "Account suspended", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, Error> {
    let service = LoginService::new(&state.db, &state.connect, &state.required_scopes);

    let outcome = service
        .login(&body.code, util::browser_token(&headers), body.remember)
        .await?;

    let response = LoginResponse {
        token: outcome.session_token,
        user: UserDto::from_records(outcome.user, outcome.profile, outcome.settings),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Refresh the logged in user's identity from VATSIM Connect
///
/// Uses the stored refresh token; the session itself is untouched.
///
/// # Responses
/// - 200 (OK): Returns the refreshed user record
/// - 401 (Unauthorized): No live session for the presented token
/// - 500 (Internal Server Error): Provider outage or database error
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Refreshed user record", body = UserDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    let token = util::bearer_token(&headers)?;
    let user = SessionService::new(&state.db).resolve(token).await?;

    let service = LoginService::new(&state.db, &state.connect, &state.required_scopes);
    let (user, profile) = service.refresh(user).await?;

    let settings = SettingsRepository::new(&state.db)
        .ensure_default(user.id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(UserDto::from_records(user, profile, settings)),
    ))
}

/// Get the logged in user's record
///
/// # Responses
/// - 200 (OK): Returns the user record
/// - 401 (Unauthorized): No live session for the presented token
/// - 500 (Internal Server Error): Database error
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user record", body = UserDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 404, description = "Profile not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    let token = util::bearer_token(&headers)?;
    let user = SessionService::new(&state.db).resolve(token).await?;

    let profile = ProfileRepository::new(&state.db)
        .get(user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Profile".to_string()))?;
    let settings = SettingsRepository::new(&state.db)
        .ensure_default(user.id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(UserDto::from_records(user, profile, settings)),
    ))
}

/// Log out by destroying the presented session
///
/// # Responses
/// - 204 (No Content): Session destroyed (or was already gone)
/// - 401 (Unauthorized): No bearer token presented
/// - 500 (Internal Server Error): Database error
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    let token = util::bearer_token(&headers)?;
    SessionService::new(&state.db).logout(token).await?;

    Ok(StatusCode::NO_CONTENT)
}
