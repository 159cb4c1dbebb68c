use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{config::Config, error::Error, external::CALL_TIMEOUT};

/// Client for the VATEUD Core system of record.
///
/// Every failure mode (missing API key, network error, non-2xx response)
/// collapses to `None`: the caller cannot distinguish causes and must treat
/// each the same way, by scheduling a retry.
#[derive(Clone)]
pub struct VateudClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Body of `POST /solo`.
#[derive(Debug, Clone, Serialize)]
pub struct SoloCreateBody {
    pub user_cid: i32,
    pub instructor_cid: i32,
    pub position: String,
    pub expire_at: NaiveDateTime,
}

/// Remote record returned by a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSolo {
    pub id: String,
}

#[derive(Deserialize)]
struct SoloCreateResponse {
    data: SoloCreateData,
}

#[derive(Deserialize)]
struct SoloCreateData {
    #[serde(deserialize_with = "de_id")]
    id: String,
}

impl VateudClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(CALL_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(&config.vateud_base_url, config.vateud_api_key.clone())
    }

    /// Mirrors a solo authorization remotely, returning the remote record
    /// on success.
    pub async fn create_solo(&self, body: &SoloCreateBody) -> Option<RemoteSolo> {
        let api_key = self.require_api_key()?;

        let response = match self
            .http
            .post(format!("{}/solo", self.base_url))
            .header("x-api-key", api_key)
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Solo create request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Solo create returned status {}", response.status());
            return None;
        }

        match response.json::<SoloCreateResponse>().await {
            Ok(created) => Some(RemoteSolo {
                id: created.data.id,
            }),
            Err(e) => {
                tracing::warn!("Solo create returned malformed response: {}", e);
                None
            }
        }
    }

    /// Removes a previously mirrored solo authorization by remote id.
    pub async fn remove_solo(&self, remote_id: &str) -> Option<()> {
        let api_key = self.require_api_key()?;

        let response = match self
            .http
            .delete(format!("{}/solo/{}", self.base_url, remote_id))
            .header("x-api-key", api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Solo remove request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Solo remove returned status {}", response.status());
            return None;
        }

        Some(())
    }

    fn require_api_key(&self) -> Option<&str> {
        if self.api_key.is_none() {
            tracing::warn!("VATEUD API key is not configured, treating call as failed");
        }
        self.api_key.as_deref()
    }
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Num(n) => n.to_string(),
        Raw::Str(s) => s,
    })
}
