//! Typed OAuth scope handling.
//!
//! Granted and required scopes are modeled as sets of an enumerated
//! capability type rather than ad hoc space-delimited strings, so the
//! "granted covers required" check is a plain subset test.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// A capability the identity provider can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scope {
    FullName,
    Email,
    VatsimDetails,
    Country,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::VatsimDetails => "vatsim_details",
            Self::Country => "country",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_name" => Ok(Self::FullName),
            "email" => Ok(Self::Email),
            "vatsim_details" => Ok(Self::VatsimDetails),
            "country" => Ok(Self::Country),
            other => Err(other.to_string()),
        }
    }
}

/// An unordered set of scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet(BTreeSet<Scope>);

impl ScopeSet {
    /// Parses a space-delimited scope list, ignoring scopes this
    /// application does not know about. Used for provider-granted scopes,
    /// where the provider may hand out more than we asked for.
    pub fn parse_lossy(raw: &str) -> Self {
        Self(
            raw.split_whitespace()
                .filter_map(|s| Scope::from_str(s).ok())
                .collect(),
        )
    }

    /// Parses a space-delimited scope list, failing on the first unknown
    /// scope. Used for the configured required set, where a typo must not
    /// silently weaken the login check.
    pub fn parse_strict(raw: &str) -> Result<Self, String> {
        raw.split_whitespace()
            .map(Scope::from_str)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.0.contains(&scope)
    }

    pub fn is_superset(&self, required: &ScopeSet) -> bool {
        self.0.is_superset(&required.0)
    }

    /// Scopes present in `required` but not in `self`.
    pub fn missing_from(&self, required: &ScopeSet) -> ScopeSet {
        Self(required.0.difference(&self.0).copied().collect())
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for scope in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            f.write_str(scope.as_str())?;
        }
        Ok(())
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// The provider has returned scopes both as a space-delimited string and as
// a JSON list depending on endpoint version; accept either, lossily.
impl<'de> Deserialize<'de> for ScopeSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Joined(String),
            List(Vec<String>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Joined(s) => Ok(ScopeSet::parse_lossy(&s)),
            Raw::List(items) => Ok(ScopeSet::parse_lossy(&items.join(" "))),
        }
    }
}
