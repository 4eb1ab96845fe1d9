//! Games joined with their match metadata and draft rows.

use std::collections::HashMap;

use serde::Deserialize;

use crate::models::{
    DraftAction, DraftGame, DraftMatch, DraftPick, GameId, Hero, HeroId, MatchId, Role, Side,
    TeamId, Tournament, TournamentId, VersionId,
};
use crate::storage::{StorageError, Store};

/// Narrows which games analytics look at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsFilter {
    pub version_id: Option<VersionId>,
    pub tournament_id: Option<TournamentId>,

    /// Only games this team played, on either side
    pub team_id: Option<TeamId>,
}

/// Heroes a side picked, with their assigned roles.
#[derive(Debug, Clone, Default)]
pub struct Lineup {
    pub picks: Vec<(HeroId, Option<Role>)>,
}

impl Lineup {
    /// Whether the lineup has `hero_id`, in `role` when one is given.
    pub fn has(&self, hero_id: &HeroId, role: Option<Role>) -> bool {
        self.picks
            .iter()
            .any(|(h, r)| h == hero_id && (role.is_none() || *r == role))
    }

    pub fn hero_in(&self, role: Role) -> Option<&HeroId> {
        self.picks
            .iter()
            .find(|(_, r)| *r == Some(role))
            .map(|(h, _)| h)
    }

    pub fn role_of(&self, hero_id: &HeroId) -> Option<Role> {
        self.picks
            .iter()
            .find(|(h, _)| h == hero_id)
            .and_then(|(_, r)| *r)
    }

    pub fn heroes(&self) -> impl Iterator<Item = &HeroId> {
        self.picks.iter().map(|(h, _)| h)
    }
}

/// One recorded game ready for analysis.
#[derive(Debug, Clone)]
pub struct GameView {
    pub game_id: GameId,
    pub match_id: MatchId,
    pub tournament_id: Option<TournamentId>,
    pub version_id: Option<VersionId>,
    pub blue_team_id: TeamId,
    pub red_team_id: TeamId,
    pub winner: Option<Side>,
    pub blue: Lineup,
    pub red: Lineup,
    pub blue_bans: Vec<HeroId>,
    pub red_bans: Vec<HeroId>,
}

impl GameView {
    pub fn lineup(&self, side: Side) -> &Lineup {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    pub fn bans(&self, side: Side) -> &[HeroId] {
        match side {
            Side::Blue => &self.blue_bans,
            Side::Red => &self.red_bans,
        }
    }

    pub fn team(&self, side: Side) -> &TeamId {
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

    /// `Some(true)` if `side` won, `None` while the game has no result.
    pub fn won(&self, side: Side) -> Option<bool> {
        self.winner.map(|w| w == side)
    }

    pub fn is_banned(&self, hero_id: &HeroId) -> bool {
        self.blue_bans.contains(hero_id) || self.red_bans.contains(hero_id)
    }
}

/// The games analytics run over, plus hero names for display.
#[derive(Debug, Clone, Default)]
pub struct DraftDataset {
    pub games: Vec<GameView>,
    pub hero_names: HashMap<HeroId, String>,
}

impl DraftDataset {
    /// Load and join everything in the store that passes `filter`.
    pub fn load(store: &Store, filter: &AnalyticsFilter) -> Result<Self, StorageError> {
        let tournaments: Vec<Tournament> = store.list()?;
        let matches: Vec<DraftMatch> = store.list()?;
        let games: Vec<DraftGame> = store.list()?;
        let picks: Vec<DraftPick> = store.list()?;
        let heroes: Vec<Hero> = store.list()?;

        Ok(Self::from_parts(
            &tournaments,
            &matches,
            games,
            picks,
            &heroes,
            filter,
        ))
    }

    /// Join already-loaded rows. Games whose match is missing are dropped.
    pub fn from_parts(
        tournaments: &[Tournament],
        matches: &[DraftMatch],
        games: Vec<DraftGame>,
        picks: Vec<DraftPick>,
        heroes: &[Hero],
        filter: &AnalyticsFilter,
    ) -> Self {
        let tournament_versions: HashMap<&TournamentId, &VersionId> = tournaments
            .iter()
            .filter_map(|t| t.version_id.as_ref().map(|v| (&t.id, v)))
            .collect();
        let matches_by_id: HashMap<&MatchId, &DraftMatch> =
            matches.iter().map(|m| (&m.id, m)).collect();

        let mut picks_by_game: HashMap<GameId, Vec<DraftPick>> = HashMap::new();
        for pick in picks {
            picks_by_game
                .entry(pick.game_id.clone())
                .or_default()
                .push(pick);
        }

        let mut views = Vec::new();
        for game in games {
            let Some(m) = matches_by_id.get(&game.match_id) else {
                continue;
            };

            // A match's own version wins over its tournament's.
            let version_id = m.version_id.clone().or_else(|| {
                m.tournament_id
                    .as_ref()
                    .and_then(|t| tournament_versions.get(t))
                    .map(|v| (*v).clone())
            });

            if let Some(ref want) = filter.version_id {
                if version_id.as_ref() != Some(want) {
                    continue;
                }
            }
            if let Some(ref want) = filter.tournament_id {
                if m.tournament_id.as_ref() != Some(want) {
                    continue;
                }
            }
            if let Some(ref team) = filter.team_id {
                if game.side_of(team).is_none() {
                    continue;
                }
            }

            let mut game_picks = picks_by_game.remove(&game.id).unwrap_or_default();
            game_picks.sort_by_key(|p| p.order);

            let mut view = GameView {
                game_id: game.id,
                match_id: game.match_id,
                tournament_id: m.tournament_id.clone(),
                version_id,
                blue_team_id: game.blue_team_id,
                red_team_id: game.red_team_id,
                winner: game.winner,
                blue: Lineup::default(),
                red: Lineup::default(),
                blue_bans: Vec::new(),
                red_bans: Vec::new(),
            };
            for pick in game_picks {
                match (pick.action, pick.side) {
                    (DraftAction::Pick, Side::Blue) => {
                        view.blue.picks.push((pick.hero_id, pick.role))
                    }
                    (DraftAction::Pick, Side::Red) => {
                        view.red.picks.push((pick.hero_id, pick.role))
                    }
                    (DraftAction::Ban, Side::Blue) => view.blue_bans.push(pick.hero_id),
                    (DraftAction::Ban, Side::Red) => view.red_bans.push(pick.hero_id),
                }
            }
            views.push(view);
        }

        let hero_names = heroes
            .iter()
            .map(|h| (h.id.clone(), h.name.clone()))
            .collect();

        Self {
            games: views,
            hero_names,
        }
    }

    /// Display name of a hero, falling back to its id.
    pub fn name_of(&self, hero_id: &HeroId) -> String {
        self.hero_names
            .get(hero_id)
            .cloned()
            .unwrap_or_else(|| hero_id.to_string())
    }

    pub fn decided_games(&self) -> impl Iterator<Item = &GameView> {
        self.games.iter().filter(|g| g.winner.is_some())
    }
}
