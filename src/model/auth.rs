//! Wire types for the VATSIM Connect identity provider.
//!
//! Field layout mirrors the provider's responses: the token endpoint returns
//! a flat grant document, the profile endpoint nests everything under
//! `data`. Numeric identifiers occasionally arrive as strings, so the
//! deserializers accept both.

use serde::{Deserialize, Deserializer};

use crate::model::scope::ScopeSet;

/// Successful response from `POST /oauth/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scopes: ScopeSet,
}

/// Response from `GET /api/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDocument {
    pub data: ProfileData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileData {
    #[serde(deserialize_with = "de_i32")]
    pub cid: i32,
    pub personal: PersonalData,
    pub vatsim: VatsimData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonalData {
    pub name_first: String,
    pub name_last: String,
    pub email: String,
    pub country: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VatsimData {
    pub rating: RatingRef,
    pub pilotrating: RatingRef,
    pub region: NamedRef,
    pub division: NamedRef,
    pub subdivision: NamedRef,
    /// Whether the provider considers the issued tokens durable. When
    /// false, tokens must not be persisted locally.
    #[serde(default)]
    pub token_valid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatingRef {
    pub id: i32,
}

/// An `{id, name}` pair where either side may be null (e.g. users without a
/// subdivision) and ids may arrive as numbers or strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedRef {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

fn de_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i32),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Num(n) => n.to_string(),
        Raw::Str(s) => s,
    }))
}
