//! HTTP routing and OpenAPI documentation configuration.
//!
//! All API endpoints are registered here with their utoipa specifications,
//! and Swagger UI is served at `/api/docs` with the OpenAPI document at
//! `/api/docs/openapi.json`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and Swagger
/// UI documentation.
///
/// # Registered Endpoints
/// - `POST /api/auth/login` - Log in with a VATSIM Connect code
/// - `POST /api/auth/refresh` - Refresh the current user from Connect
/// - `GET /api/auth/user` - Get the current user record
/// - `POST /api/auth/logout` - Destroy the current session
/// - `POST /api/solos` - Create a solo authorization
/// - `DELETE /api/solos/{id}` - Remove a solo authorization
/// - `GET /api/delivery/dead-letter` - List dead-lettered delivery jobs
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "Trainingcenter", description = "Trainingcenter API"), tags(
        (name = controller::auth::AUTH_TAG, description = "Authentication API routes"),
        (name = controller::solo::SOLO_TAG, description = "Solo authorization API routes"),
        (name = controller::delivery::DELIVERY_TAG, description = "Delivery queue API routes"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::refresh))
        .routes(routes!(controller::auth::get_user))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::solo::create_solo))
        .routes(routes!(controller::solo::remove_solo))
        .routes(routes!(controller::delivery::list_dead_letters))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
