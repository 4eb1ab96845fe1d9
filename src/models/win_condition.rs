//! Win conditions: saved team-composition rules whose historical win rate
//! is computed on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, HeroId, Role, TournamentId, VersionId};

/// Which team a rule looks at, relative to the team being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTeam {
    Ally,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Include,
    Exclude,
}

/// "The ally/enemy team must (not) have this hero (in this role)."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRule {
    pub hero_id: HeroId,

    /// Any role when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default = "default_team")]
    pub team: RuleTeam,

    #[serde(default = "default_presence")]
    pub presence: Presence,
}

fn default_team() -> RuleTeam {
    RuleTeam::Ally
}

fn default_presence() -> Presence {
    Presence::Include
}

impl ConditionRule {
    pub fn include(hero_id: HeroId, role: Option<Role>) -> Self {
        Self {
            hero_id,
            role,
            team: RuleTeam::Ally,
            presence: Presence::Include,
        }
    }

    pub fn exclude(hero_id: HeroId, role: Option<Role>) -> Self {
        Self {
            presence: Presence::Exclude,
            ..Self::include(hero_id, role)
        }
    }

    pub fn against(mut self) -> Self {
        self.team = RuleTeam::Enemy;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinCondition {
    pub id: EntityId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Restrict evaluation to one patch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<VersionId>,

    /// Restrict evaluation to one tournament
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_id: Option<TournamentId>,

    pub rules: Vec<ConditionRule>,

    pub created_at: DateTime<Utc>,
}

impl WinCondition {
    pub fn new(name: String, rules: Vec<ConditionRule>) -> Self {
        Self {
            id: EntityId::random(),
            name,
            description: None,
            version_id: None,
            tournament_id: None,
            rules,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_defaults_from_json() {
        let rule: ConditionRule = serde_json::from_str(r#"{"hero_id":"h1"}"#).unwrap();
        assert_eq!(rule.team, RuleTeam::Ally);
        assert_eq!(rule.presence, Presence::Include);
        assert_eq!(rule.role, None);
    }

    #[test]
    fn test_rule_builders() {
        let rule = ConditionRule::exclude("h1".into(), Some(Role::Jungle)).against();
        assert_eq!(rule.team, RuleTeam::Enemy);
        assert_eq!(rule.presence, Presence::Exclude);
        assert_eq!(rule.role, Some(Role::Jungle));
    }
}
