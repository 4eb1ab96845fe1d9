//! Recorded matches, games and their ban/pick rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    EntityId, GameId, HeroId, MatchId, PlayerId, Role, TeamId, TournamentId, VersionId,
};

/// Draft side. Blue bans and picks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Side::Blue => 'B',
            Side::Red => 'R',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Blue => write!(f, "blue"),
            Side::Red => write!(f, "red"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftAction {
    Ban,
    Pick,
}

impl fmt::Display for DraftAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftAction::Ban => write!(f, "ban"),
            DraftAction::Pick => write!(f, "pick"),
        }
    }
}

/// A series between two teams (best-of-N).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftMatch {
    pub id: MatchId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_id: Option<TournamentId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<VersionId>,

    pub team_a_id: TeamId,
    pub team_b_id: TeamId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_date: Option<NaiveDate>,

    #[serde(default = "default_best_of")]
    pub best_of: u8,

    pub created_at: DateTime<Utc>,
}

fn default_best_of() -> u8 {
    1
}

impl DraftMatch {
    pub fn new(team_a_id: TeamId, team_b_id: TeamId) -> Self {
        Self {
            id: EntityId::random(),
            tournament_id: None,
            version_id: None,
            team_a_id,
            team_b_id,
            match_date: None,
            best_of: default_best_of(),
            created_at: Utc::now(),
        }
    }

    pub fn involves(&self, team_id: &TeamId) -> bool {
        &self.team_a_id == team_id || &self.team_b_id == team_id
    }
}

/// One game of a match, with its own draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftGame {
    pub id: GameId,
    pub match_id: MatchId,
    pub game_number: u8,
    pub blue_team_id: TeamId,
    pub red_team_id: TeamId,

    /// Winning side, unset until the result is entered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,

    pub created_at: DateTime<Utc>,
}

impl DraftGame {
    pub fn new(
        match_id: MatchId,
        game_number: u8,
        blue_team_id: TeamId,
        red_team_id: TeamId,
    ) -> Self {
        Self {
            id: EntityId::random(),
            match_id,
            game_number,
            blue_team_id,
            red_team_id,
            winner: None,
            duration_seconds: None,
            created_at: Utc::now(),
        }
    }

    pub fn team_on(&self, side: Side) -> &TeamId {
        match side {
            Side::Blue => &self.blue_team_id,
            Side::Red => &self.red_team_id,
        }
    }

    pub fn side_of(&self, team_id: &TeamId) -> Option<Side> {
        if &self.blue_team_id == team_id {
            Some(Side::Blue)
        } else if &self.red_team_id == team_id {
            Some(Side::Red)
        } else {
            None
        }
    }
}

/// A single ban or pick within a game's draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    /// Derived from game id + order
    pub id: EntityId,
    pub game_id: GameId,

    /// Step in the draft sequence, 1..=20
    pub order: u8,

    pub side: Side,
    pub action: DraftAction,
    pub hero_id: HeroId,

    /// Lane the picked hero plays; never set on bans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
}

impl DraftPick {
    pub fn new(
        game_id: GameId,
        order: u8,
        side: Side,
        action: DraftAction,
        hero_id: HeroId,
    ) -> Self {
        let id = EntityId::generate(&[game_id.as_str(), &order.to_string()]);
        Self {
            id,
            game_id,
            order,
            side,
            action,
            hero_id,
            role: None,
            player_id: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}
