//! Repositories over the SeaORM entities.
//!
//! Repositories are generic over the connection so the same methods can run
//! against the pooled connection or inside a transaction where atomicity
//! matters (profile reconciliation, session replacement).

pub mod delivery;
pub mod profile;
pub mod session;
pub mod settings;
pub mod solo;
pub mod user;
