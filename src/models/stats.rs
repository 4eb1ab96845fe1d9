//! Derived statistics models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{GameId, HeroId, MatchId, Role, Side, TeamId};

/// Tier classification based on win rate percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    /// Calculate tier from a win rate in percent.
    pub fn from_win_rate(win_rate: f64) -> Self {
        if win_rate >= 55.0 {
            Tier::S
        } else if win_rate >= 52.0 {
            Tier::A
        } else if win_rate >= 48.0 {
            Tier::B
        } else if win_rate >= 45.0 {
            Tier::C
        } else {
            Tier::D
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::S => write!(f, "S"),
            Tier::A => write!(f, "A"),
            Tier::B => write!(f, "B"),
            Tier::C => write!(f, "C"),
            Tier::D => write!(f, "D"),
        }
    }
}

/// Per-hero draft statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroStat {
    pub hero_id: HeroId,
    pub name: String,
    pub picks: u32,
    pub bans: u32,
    pub wins: u32,
    pub losses: u32,

    /// Percent of games the hero was picked in
    pub pick_rate: f64,

    /// Percent of games the hero was banned in
    pub ban_rate: f64,

    /// Percent of games the hero was picked or banned in
    pub presence: f64,

    /// Wins over decided games with the hero picked
    pub win_rate: f64,

    /// None until the hero has a decided game
    pub tier: Option<Tier>,

    /// Picks per role
    pub roles: BTreeMap<Role, u32>,

    pub primary_role: Option<Role>,
}

/// Two heroes drafted on the same side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuoSynergy {
    pub hero_a_id: HeroId,
    pub hero_a_name: String,
    pub hero_b_id: HeroId,
    pub hero_b_name: String,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub hero_a_win_rate: f64,
    pub hero_b_win_rate: f64,

    /// Duo win rate minus the mean of the two individual win rates
    pub synergy: f64,
}

/// Observed results of a stored combo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboStat {
    pub combo_id: String,
    pub name: Option<String>,
    pub hero_a_id: HeroId,
    pub hero_a_name: String,
    pub hero_b_id: HeroId,
    pub hero_b_name: String,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
}

/// A hero's observed record against one lane opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneMatchupStat {
    pub role: Role,
    pub enemy_hero_id: HeroId,
    pub enemy_name: String,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolHero {
    pub hero_id: HeroId,
    pub name: String,
    pub picks: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub roles: BTreeMap<Role, u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanCount {
    pub hero_id: HeroId,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SideRecord {
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
}

/// Hero pool of a single team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPool {
    pub team_id: TeamId,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub blue: SideRecord,
    pub red: SideRecord,
    pub heroes: Vec<PoolHero>,
    pub bans_by_team: Vec<BanCount>,
    pub bans_against_team: Vec<BanCount>,
}

/// One game/side that satisfied every rule of a win condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionMatch {
    pub game_id: GameId,
    pub match_id: MatchId,
    pub side: Side,
    pub team_id: TeamId,
    pub won: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinConditionResult {
    pub games_scanned: u32,
    pub matches_found: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub matches: Vec<ConditionMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(Tier::from_win_rate(60.0), Tier::S);
        assert_eq!(Tier::from_win_rate(53.0), Tier::A);
        assert_eq!(Tier::from_win_rate(50.0), Tier::B);
        assert_eq!(Tier::from_win_rate(46.0), Tier::C);
        assert_eq!(Tier::from_win_rate(40.0), Tier::D);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::S.to_string(), "S");
        assert_eq!(Tier::D.to_string(), "D");
    }
}
