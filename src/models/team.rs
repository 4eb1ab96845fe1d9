//! Teams and players.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, PlayerId, Role, TeamId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,

    /// Tag shown on the draft board, e.g. "BAC"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: String) -> Self {
        Self {
            id: EntityId::random(),
            name,
            short_name: None,
            region: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(name: String, team_id: Option<TeamId>, role: Option<Role>) -> Self {
        Self {
            id: EntityId::random(),
            name,
            team_id,
            role,
            created_at: Utc::now(),
        }
    }
}
