pub use super::delivery_job::Entity as DeliveryJob;
pub use super::solo_authorization::Entity as SoloAuthorization;
pub use super::user::Entity as User;
pub use super::user_profile::Entity as UserProfile;
pub use super::user_session::Entity as UserSession;
pub use super::user_settings::Entity as UserSettings;
