pub mod prelude;

pub mod delivery_job;
pub mod solo_authorization;
pub mod user;
pub mod user_profile;
pub mod user_session;
pub mod user_settings;
