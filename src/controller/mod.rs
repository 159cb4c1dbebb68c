//! HTTP controller endpoints for the trainingcenter API.
//!
//! Controllers stay thin: extract inputs, call a service, shape the
//! response. All handlers are annotated with utoipa for the OpenAPI
//! document served by the router.

pub mod auth;
pub mod delivery;
pub mod solo;
pub mod util;
