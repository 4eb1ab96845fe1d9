//! Matches (series) and the games recorded under them.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::drafts::{into_picks, next_step, PickInput};
use super::{ensure_opt_ref, ensure_ref};
use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::draft::{open_roles, validate_draft, DraftReport, DraftStep};
use crate::models::{
    DraftGame, DraftMatch, DraftPick, EntityId, GameId, Hero, MatchId, Player, Role, Side, Team,
    TeamId, Tournament, TournamentId, Version, VersionId,
};
use crate::storage::{StorageError, Store};

const MAX_BEST_OF: u8 = 7;

#[derive(Debug, Deserialize)]
pub struct ListMatchesParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub tournament_id: Option<TournamentId>,
    pub team_id: Option<TeamId>,
}

#[derive(Debug, Serialize)]
pub struct MatchSummary {
    #[serde(flatten)]
    pub draft_match: DraftMatch,
    pub games_played: u32,
    pub team_a_wins: u32,
    pub team_b_wins: u32,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchSummary>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub summary: MatchSummary,
    pub games: Vec<DraftGame>,
}

#[derive(Debug, Deserialize)]
pub struct MatchInput {
    pub tournament_id: Option<TournamentId>,
    pub version_id: Option<VersionId>,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub match_date: Option<NaiveDate>,
    pub best_of: Option<u8>,
}

impl MatchInput {
    fn apply(self, store: &Store, draft_match: &mut DraftMatch) -> Result<(), ApiError> {
        if self.team_a_id == self.team_b_id {
            return Err(ApiError::BadRequest(
                "a match needs two different teams".to_string(),
            ));
        }
        let best_of = self.best_of.unwrap_or(draft_match.best_of);
        if best_of == 0 || best_of > MAX_BEST_OF || best_of % 2 == 0 {
            return Err(ApiError::BadRequest(format!(
                "best_of must be an odd number between 1 and {}",
                MAX_BEST_OF
            )));
        }
        ensure_ref::<Team>(store, &self.team_a_id)?;
        ensure_ref::<Team>(store, &self.team_b_id)?;
        ensure_opt_ref::<Tournament>(store, self.tournament_id.as_ref())?;
        ensure_opt_ref::<Version>(store, self.version_id.as_ref())?;

        draft_match.tournament_id = self.tournament_id;
        draft_match.version_id = self.version_id;
        draft_match.team_a_id = self.team_a_id;
        draft_match.team_b_id = self.team_b_id;
        draft_match.match_date = self.match_date;
        draft_match.best_of = best_of;
        Ok(())
    }
}

fn summarize(draft_match: DraftMatch, games: &[DraftGame]) -> MatchSummary {
    let mut summary = MatchSummary {
        games_played: 0,
        team_a_wins: 0,
        team_b_wins: 0,
        draft_match,
    };
    for game in games.iter().filter(|g| g.match_id == summary.draft_match.id) {
        summary.games_played += 1;
        let Some(side) = game.winner else { continue };
        let winner = game.team_on(side);
        if *winner == summary.draft_match.team_a_id {
            summary.team_a_wins += 1;
        } else if *winner == summary.draft_match.team_b_id {
            summary.team_b_wins += 1;
        }
    }
    summary
}

fn games_of(store: &Store, match_id: &MatchId) -> Result<Vec<DraftGame>, ApiError> {
    let mut games = store.list_where(|g: &DraftGame| &g.match_id == match_id)?;
    games.sort_by_key(|g| g.game_number);
    Ok(games)
}

/// Newest first, paginated.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListMatchesParams>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let pagination = Pagination::new(params.page, params.page_size);

    let mut matches: Vec<DraftMatch> = state.store.list_where(|m: &DraftMatch| {
        params
            .tournament_id
            .as_ref()
            .map_or(true, |t| m.tournament_id.as_ref() == Some(t))
            && params.team_id.as_ref().map_or(true, |t| m.involves(t))
    })?;
    matches.sort_by(|a, b| {
        b.match_date
            .cmp(&a.match_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    let total = matches.len() as u32;
    let games: Vec<DraftGame> = state.store.list()?;
    let page = pagination
        .slice(&matches)
        .iter()
        .cloned()
        .map(|m| summarize(m, &games))
        .collect();

    Ok(Json(MatchListResponse {
        matches: page,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MatchDetail>, ApiError> {
    let draft_match: DraftMatch = state.store.require(&EntityId::from(id))?;
    let games = games_of(&state.store, &draft_match.id)?;

    Ok(Json(MatchDetail {
        summary: summarize(draft_match, &games),
        games,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<MatchInput>,
) -> Result<(StatusCode, Json<DraftMatch>), ApiError> {
    let mut draft_match = DraftMatch::new(input.team_a_id.clone(), input.team_b_id.clone());
    input.apply(&state.store, &mut draft_match)?;

    state.store.insert(&draft_match)?;
    tracing::info!(
        "Created match {} ({} vs {}, bo{})",
        draft_match.id,
        draft_match.team_a_id,
        draft_match.team_b_id,
        draft_match.best_of
    );
    Ok((StatusCode::CREATED, Json(draft_match)))
}

/// Teams can only change while no games are recorded.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MatchInput>,
) -> Result<Json<DraftMatch>, ApiError> {
    let mut draft_match: DraftMatch = state.store.require(&EntityId::from(id))?;
    let games = games_of(&state.store, &draft_match.id)?;

    let same_teams = [&input.team_a_id, &input.team_b_id]
        .into_iter()
        .all(|t| draft_match.involves(t));
    if !games.is_empty() && !same_teams {
        return Err(ApiError::Conflict(
            "cannot change teams of a match with recorded games".to_string(),
        ));
    }
    if let Some(best_of) = input.best_of {
        if games.iter().any(|g| g.game_number > best_of) {
            return Err(ApiError::Conflict(format!(
                "match already has games beyond bo{}",
                best_of
            )));
        }
    }

    input.apply(&state.store, &mut draft_match)?;
    state.store.update(draft_match.clone())?;
    Ok(Json(draft_match))
}

/// Deletes the match with all of its games and draft picks.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = EntityId::from(id);
    let store = &state.store;
    if !store.exists::<DraftMatch>(&id)? {
        return Err(ApiError::NotFound(format!("match not found: {}", id)));
    }

    let game_ids: HashSet<GameId> = games_of(store, &id)?.into_iter().map(|g| g.id).collect();
    let picks = store.delete_where(|p: &DraftPick| game_ids.contains(&p.game_id))?;
    let games = store.delete_where(|g: &DraftGame| g.match_id == id)?;
    store.delete::<DraftMatch>(&id)?;

    tracing::info!(
        "Deleted match {} with {} game(s) and {} pick(s)",
        id,
        games,
        picks
    );
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct GameListResponse {
    pub games: Vec<DraftGame>,
}

pub async fn list_games(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameListResponse>, ApiError> {
    let draft_match: DraftMatch = state.store.require(&EntityId::from(id))?;
    Ok(Json(GameListResponse {
        games: games_of(&state.store, &draft_match.id)?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GameInput {
    pub game_number: Option<u8>,
    pub blue_team_id: TeamId,
    pub red_team_id: TeamId,
    pub winner: Option<Side>,
    pub duration_seconds: Option<u32>,
    #[serde(default)]
    pub picks: Vec<PickInput>,
}

#[derive(Debug, Serialize)]
pub struct OpenRoles {
    pub blue: Vec<Role>,
    pub red: Vec<Role>,
}

#[derive(Debug, Serialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub game: DraftGame,
    pub picks: Vec<DraftPick>,
    pub draft: DraftReport,
    pub next_step: Option<DraftStep>,
    pub open_roles: OpenRoles,
}

impl GameDetail {
    fn new(game: DraftGame, picks: Vec<DraftPick>) -> Self {
        let draft = validate_draft(&picks);
        let open_roles = OpenRoles {
            blue: open_roles(&picks, Side::Blue).into_iter().collect(),
            red: open_roles(&picks, Side::Red).into_iter().collect(),
        };
        Self {
            next_step: next_step(&draft),
            game,
            picks,
            draft,
            open_roles,
        }
    }
}

/// Check game metadata and the draft before anything is written.
fn check_game(
    store: &Store,
    draft_match: &DraftMatch,
    game: &DraftGame,
    picks: &[DraftPick],
) -> Result<(), ApiError> {
    if game.blue_team_id == game.red_team_id
        || !draft_match.involves(&game.blue_team_id)
        || !draft_match.involves(&game.red_team_id)
    {
        return Err(ApiError::BadRequest(
            "blue and red must be the two teams of the match".to_string(),
        ));
    }
    if game.game_number == 0 || game.game_number > draft_match.best_of {
        return Err(ApiError::BadRequest(format!(
            "game_number must be between 1 and {}",
            draft_match.best_of
        )));
    }

    let report = validate_draft(picks);
    if !report.is_valid() {
        return Err(ApiError::InvalidDraft(report));
    }

    let known_heroes: HashSet<EntityId> =
        store.list::<Hero>()?.into_iter().map(|h| h.id).collect();
    let mut unknown: Vec<&str> = picks
        .iter()
        .filter(|p| !known_heroes.contains(&p.hero_id))
        .map(|p| p.hero_id.as_str())
        .collect();
    unknown.dedup();
    if !unknown.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "unknown hero(es): {}",
            unknown.join(", ")
        )));
    }

    for player_id in picks.iter().filter_map(|p| p.player_id.as_ref()) {
        ensure_ref::<Player>(store, player_id)?;
    }
    Ok(())
}

/// Swap in the game row and its picks.
fn save_game(store: &Store, game: &DraftGame, picks: Vec<DraftPick>) -> Result<(), ApiError> {
    store.modify(|games: &mut Vec<DraftGame>| {
        let clash = games.iter().any(|g| {
            g.match_id == game.match_id && g.game_number == game.game_number && g.id != game.id
        });
        if clash {
            return Err(StorageError::Duplicate {
                table: "draft_games",
                id: format!("{} game {}", game.match_id, game.game_number),
            });
        }
        games.retain(|g| g.id != game.id);
        games.push(game.clone());
        Ok(())
    })?;
    store.modify(|rows: &mut Vec<DraftPick>| {
        rows.retain(|p| p.game_id != game.id);
        rows.extend(picks);
        Ok(())
    })?;
    Ok(())
}

fn picks_of(store: &Store, game_id: &GameId) -> Result<Vec<DraftPick>, ApiError> {
    let mut picks = store.list_where(|p: &DraftPick| &p.game_id == game_id)?;
    picks.sort_by_key(|p| p.order);
    Ok(picks)
}

pub async fn create_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<GameInput>,
) -> Result<(StatusCode, Json<GameDetail>), ApiError> {
    let draft_match: DraftMatch = state.store.require(&EntityId::from(id))?;
    let existing = games_of(&state.store, &draft_match.id)?;
    let game_number = input
        .game_number
        .unwrap_or_else(|| existing.iter().map(|g| g.game_number).max().unwrap_or(0) + 1);

    let mut game = DraftGame::new(
        draft_match.id.clone(),
        game_number,
        input.blue_team_id,
        input.red_team_id,
    );
    game.winner = input.winner;
    game.duration_seconds = input.duration_seconds;
    let picks = into_picks(input.picks, &game.id);

    check_game(&state.store, &draft_match, &game, &picks)?;
    save_game(&state.store, &game, picks.clone())?;

    tracing::info!(
        "Recorded game {} of match {} ({} draft rows)",
        game.game_number,
        draft_match.id,
        picks.len()
    );
    Ok((StatusCode::CREATED, Json(GameDetail::new(game, picks))))
}

pub async fn show_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameDetail>, ApiError> {
    let game: DraftGame = state.store.require(&EntityId::from(id))?;
    let picks = picks_of(&state.store, &game.id)?;
    Ok(Json(GameDetail::new(game, picks)))
}

/// Replaces the game's metadata and its whole draft.
pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<GameInput>,
) -> Result<Json<GameDetail>, ApiError> {
    let mut game: DraftGame = state.store.require(&EntityId::from(id))?;
    let draft_match: DraftMatch = state.store.require(&game.match_id)?;

    game.game_number = input.game_number.unwrap_or(game.game_number);
    game.blue_team_id = input.blue_team_id;
    game.red_team_id = input.red_team_id;
    game.winner = input.winner;
    game.duration_seconds = input.duration_seconds;
    let picks = into_picks(input.picks, &game.id);

    check_game(&state.store, &draft_match, &game, &picks)?;
    save_game(&state.store, &game, picks.clone())?;
    Ok(Json(GameDetail::new(game, picks)))
}

pub async fn remove_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = EntityId::from(id);
    if !state.store.delete::<DraftGame>(&id)? {
        return Err(ApiError::NotFound(format!("game not found: {}", id)));
    }
    let picks = state.store.delete_where(|p: &DraftPick| p.game_id == id)?;
    tracing::info!("Deleted game {} and {} pick(s)", id, picks);
    Ok(StatusCode::NO_CONTENT)
}
