use crate::{error::config::ConfigError, model::scope::ScopeSet};

/// Process-wide immutable configuration, loaded once at startup and injected
/// into the clients and services that need it.
#[derive(Clone)]
pub struct Config {
    pub connect_client_id: String,
    pub connect_client_secret: String,
    pub connect_redirect_uri: String,
    pub connect_base_url: String,
    /// Scopes the deployment requires the provider to grant on login.
    pub required_scopes: ScopeSet,
    pub vateud_base_url: String,
    /// Shared API key for VATEUD Core. Optional: without it every delivery
    /// attempt fails and is queued for retry instead of erroring out.
    pub vateud_api_key: Option<String>,
    pub database_url: String,
    pub listen_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let required_scopes = ScopeSet::parse_strict(&require_var("CONNECT_REQUIRED_SCOPES")?)
            .map_err(|scope| ConfigError::InvalidEnvValue {
                var: "CONNECT_REQUIRED_SCOPES".to_string(),
                reason: format!("unknown scope {:?}", scope),
            })?;

        Ok(Self {
            connect_client_id: require_var("CONNECT_CLIENT_ID")?,
            connect_client_secret: require_var("CONNECT_CLIENT_SECRET")?,
            connect_redirect_uri: require_var("CONNECT_REDIRECT_URI")?,
            connect_base_url: require_var("CONNECT_BASE_URL")?,
            required_scopes,
            vateud_base_url: require_var("VATEUD_BASE_URL")?,
            vateud_api_key: std::env::var("VATEUD_API_KEY").ok(),
            database_url: require_var("DATABASE_URL")?,
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
        })
    }
}

fn require_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}
