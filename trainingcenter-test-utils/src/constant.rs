//! Placeholder configuration values shared across tests.
//!
//! None of these are real credentials; they exist so tests construct
//! clients the same way everywhere.

/// Mock VATSIM Connect OAuth2 client ID for testing.
pub static TEST_CONNECT_CLIENT_ID: &str = "connect_client_id";

/// Mock VATSIM Connect OAuth2 client secret for testing.
pub static TEST_CONNECT_CLIENT_SECRET: &str = "connect_client_secret";

/// OAuth2 redirect URI used in test login flows.
pub static TEST_REDIRECT_URI: &str = "http://localhost:8080/auth/callback";

/// Mock VATEUD Core API key for testing.
pub static TEST_VATEUD_API_KEY: &str = "vateud_api_key";
