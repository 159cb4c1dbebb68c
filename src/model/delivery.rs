//! Delivery job definitions for the reliable side-effect queue.
//!
//! Each variant carries everything needed to replay its outbound call from
//! scratch: jobs survive process restarts as rows in the `delivery_job`
//! table and must not depend on any in-memory state.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::delivery::DeliveryError;

/// A side-effecting call to VATEUD Core, persisted for retry when the
/// inline attempt fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DeliveryJob {
    /// Mirror a locally created solo authorization.
    ///
    /// The payload replays the original create call in full. The local solo
    /// id doubles as the correlation key used to match the remote id back
    /// onto the local record.
    SoloCreate {
        local_solo_id: i32,
        user_cid: i32,
        instructor_cid: i32,
        position: String,
        expires_at: NaiveDateTime,
    },

    /// Remove a previously mirrored solo authorization.
    ///
    /// Carries both identifiers: the remote id drives the delete call, the
    /// local id keeps the job correlatable after the local row is gone.
    SoloRemove {
        local_solo_id: i32,
        vateud_solo_id: String,
    },
}

impl DeliveryJob {
    /// Stable kind discriminator stored alongside the payload.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SoloCreate { .. } => "solo_create",
            Self::SoloRemove { .. } => "solo_remove",
        }
    }

    /// Local identifier this job belongs to.
    pub fn correlation_id(&self) -> i32 {
        match self {
            Self::SoloCreate { local_solo_id, .. } | Self::SoloRemove { local_solo_id, .. } => {
                *local_solo_id
            }
        }
    }

    pub fn to_payload(&self) -> Result<String, DeliveryError> {
        serde_json::to_string(self).map_err(|e| DeliveryError::Serialization(e.to_string()))
    }

    pub fn from_payload(payload: &str) -> Result<Self, DeliveryError> {
        serde_json::from_str(payload).map_err(|e| DeliveryError::Serialization(e.to_string()))
    }
}

impl fmt::Display for DeliveryJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (solo {})", self.kind(), self.correlation_id())
    }
}
