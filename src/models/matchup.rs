//! Staff-entered lane matchups and hero combos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, HeroId, Role, VersionId};

/// Lane-vs-lane win rate of `hero_id` against `enemy_hero_id`.
///
/// Matchups are always stored in pairs: (A, B, wr) and (B, A, 100 - wr).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    /// Derived from version + position + both heroes
    pub id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<VersionId>,

    pub position: Role,
    pub hero_id: HeroId,
    pub enemy_hero_id: HeroId,

    /// Percentage, 0 to 100
    pub win_rate: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Matchup {
    pub fn new(
        version_id: Option<VersionId>,
        position: Role,
        hero_id: HeroId,
        enemy_hero_id: HeroId,
        win_rate: f64,
    ) -> Self {
        let id = Self::key(version_id.as_ref(), position, &hero_id, &enemy_hero_id);
        Self {
            id,
            version_id,
            position,
            hero_id,
            enemy_hero_id,
            win_rate,
            note: None,
        }
    }

    /// Id for the natural key of a matchup row.
    pub fn key(
        version_id: Option<&VersionId>,
        position: Role,
        hero_id: &HeroId,
        enemy_hero_id: &HeroId,
    ) -> EntityId {
        EntityId::generate(&[
            version_id.map(|v| v.as_str()).unwrap_or(""),
            position.as_str(),
            hero_id.as_str(),
            enemy_hero_id.as_str(),
        ])
    }

    /// The same matchup seen from the enemy's side.
    pub fn mirror(&self) -> Self {
        let mut mirrored = Self::new(
            self.version_id.clone(),
            self.position,
            self.enemy_hero_id.clone(),
            self.hero_id.clone(),
            100.0 - self.win_rate,
        );
        mirrored.note = self.note.clone();
        mirrored
    }

    pub fn mirror_id(&self) -> EntityId {
        Self::key(
            self.version_id.as_ref(),
            self.position,
            &self.enemy_hero_id,
            &self.hero_id,
        )
    }
}

/// A pair of heroes tracked for their co-occurrence win rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroCombo {
    pub id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<VersionId>,

    /// Stored in sorted order so (A, B) and (B, A) are the same combo
    pub hero_a_id: HeroId,
    pub hero_b_id: HeroId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl HeroCombo {
    pub fn new(hero_1: HeroId, hero_2: HeroId) -> Self {
        let (hero_a_id, hero_b_id) = if hero_1 <= hero_2 {
            (hero_1, hero_2)
        } else {
            (hero_2, hero_1)
        };
        Self {
            id: EntityId::random(),
            version_id: None,
            hero_a_id,
            hero_b_id,
            name: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    pub fn same_pair(&self, other: &HeroCombo) -> bool {
        self.hero_a_id == other.hero_a_id
            && self.hero_b_id == other.hero_b_id
            && self.version_id == other.version_id
    }
}
