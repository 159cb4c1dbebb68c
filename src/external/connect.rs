use serde::Deserialize;

use crate::{
    config::Config,
    error::Error,
    external::CALL_TIMEOUT,
    model::auth::{ProfileDocument, TokenGrant},
};

/// Outcome of a token endpoint call.
///
/// Network errors, non-2xx responses and malformed payloads all collapse to
/// `Unavailable`; only the provider's explicit revoked-code hint is kept
/// distinct so the login flow can report it as a bad code rather than an
/// outage.
#[derive(Debug)]
pub enum TokenExchange {
    Granted(TokenGrant),
    Revoked,
    Unavailable,
}

/// Client for the VATSIM Connect identity provider.
#[derive(Clone)]
pub struct ConnectClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

#[derive(Deserialize)]
struct TokenErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ConnectClient {
    pub fn new(
        base_url: &str,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(CALL_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(
            &config.connect_base_url,
            &config.connect_client_id,
            &config.connect_client_secret,
            &config.connect_redirect_uri,
        )
    }

    /// Exchanges a one-time authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> TokenExchange {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    /// Exchanges a stored refresh token for fresh tokens.
    pub async fn exchange_refresh_token(&self, refresh_token: &str) -> TokenExchange {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ])
        .await
    }

    /// Fetches the remote profile for an access token. Any failure yields
    /// `None`; the caller decides whether that aborts the flow.
    pub async fn fetch_profile(&self, access_token: &str) -> Option<ProfileDocument> {
        let response = match self
            .http
            .get(format!("{}/api/user", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Profile fetch failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Profile fetch returned status {}", response.status());
            return None;
        }

        match response.json::<ProfileDocument>().await {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!("Profile fetch returned malformed document: {}", e);
                None
            }
        }
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> TokenExchange {
        let response = match self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Token request failed: {}", e);
                return TokenExchange::Unavailable;
            }
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<TokenGrant>().await {
                Ok(grant) => TokenExchange::Granted(grant),
                Err(e) => {
                    tracing::warn!("Token response was malformed: {}", e);
                    TokenExchange::Unavailable
                }
            };
        }

        let body = response.text().await.unwrap_or_default();
        if let Ok(error_body) = serde_json::from_str::<TokenErrorBody>(&body) {
            if mentions_revoked(&error_body) {
                return TokenExchange::Revoked;
            }
        }

        tracing::warn!("Token request returned status {}: {}", status, body);
        TokenExchange::Unavailable
    }
}

fn mentions_revoked(body: &TokenErrorBody) -> bool {
    [&body.hint, &body.error_description, &body.error]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains("revoked"))
}
