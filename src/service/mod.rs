//! Business logic services.
//!
//! Services orchestrate repositories and external clients; handlers stay
//! thin and repositories stay dumb. Each service borrows the database
//! connection and the clients it needs from [`crate::model::app::AppState`].

pub mod auth;
pub mod delivery;
pub mod solo;
