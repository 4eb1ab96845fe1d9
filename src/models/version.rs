//! Game versions (balance patches) and tournaments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, TournamentId, VersionId};

/// A game patch. Drafts are analysed per version because balance changes
/// shift the meta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,

    /// Patch label, e.g. "1.56"
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,

    #[serde(default)]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl Version {
    pub fn new(name: String, release_date: Option<NaiveDate>) -> Self {
        Self {
            id: EntityId::random(),
            name,
            release_date,
            is_active: false,
            created_at: Utc::now(),
        }
    }
}

/// A tournament that draft matches are recorded under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<VersionId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
}

impl Tournament {
    pub fn new(name: String) -> Self {
        Self {
            id: EntityId::random(),
            name,
            version_id: None,
            region: None,
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
        }
    }

    /// Start and end dates, when both are set, must be in order.
    pub fn dates_valid(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}
