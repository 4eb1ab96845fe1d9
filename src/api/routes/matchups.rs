//! Staff-entered lane matchup win rates.
//!
//! Every row is stored together with its mirror (enemy's point of view,
//! `100 - win_rate`), and writes keep the pair in sync.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{ensure_opt_ref, ensure_ref, parse_role};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{EntityId, Hero, HeroId, Matchup, Role, Version, VersionId};
use crate::storage::StorageError;

#[derive(Debug, Deserialize)]
pub struct ListMatchupsParams {
    pub version_id: Option<VersionId>,
    pub hero_id: Option<HeroId>,
    pub position: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchupListResponse {
    pub matchups: Vec<Matchup>,
}

#[derive(Debug, Serialize)]
pub struct MatchupPair {
    pub matchup: Matchup,
    pub mirror: Matchup,
}

#[derive(Debug, Deserialize)]
pub struct MatchupInput {
    pub version_id: Option<VersionId>,
    pub position: Role,
    pub hero_id: HeroId,
    pub enemy_hero_id: HeroId,
    pub win_rate: f64,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchupUpdate {
    pub win_rate: f64,
    pub note: Option<String>,
}

fn check_win_rate(win_rate: f64) -> Result<(), ApiError> {
    if win_rate.is_finite() && (0.0..=100.0).contains(&win_rate) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "win_rate must be between 0 and 100, got {}",
            win_rate
        )))
    }
}

/// Write `matchup` and its mirror, replacing whatever either id held.
fn store_pair(rows: &mut Vec<Matchup>, matchup: &Matchup) -> MatchupPair {
    let mirror = matchup.mirror();
    rows.retain(|m| m.id != matchup.id && m.id != mirror.id);
    rows.push(matchup.clone());
    rows.push(mirror.clone());
    MatchupPair {
        matchup: matchup.clone(),
        mirror,
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListMatchupsParams>,
) -> Result<Json<MatchupListResponse>, ApiError> {
    let position = parse_role(params.position.as_deref())?;

    let mut matchups: Vec<Matchup> = state.store.list_where(|m: &Matchup| {
        params.version_id.is_none() || m.version_id == params.version_id
    })?;
    matchups.retain(|m| {
        position.map_or(true, |p| m.position == p)
            && params.hero_id.as_ref().map_or(true, |h| &m.hero_id == h)
    });
    matchups.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| b.win_rate.total_cmp(&a.win_rate))
    });
    Ok(Json(MatchupListResponse { matchups }))
}

/// Creating an existing (version, position, hero, enemy) key overwrites it.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<MatchupInput>,
) -> Result<(StatusCode, Json<MatchupPair>), ApiError> {
    if input.hero_id == input.enemy_hero_id {
        return Err(ApiError::BadRequest(
            "a hero cannot be matched up against itself".to_string(),
        ));
    }
    check_win_rate(input.win_rate)?;
    ensure_ref::<Hero>(&state.store, &input.hero_id)?;
    ensure_ref::<Hero>(&state.store, &input.enemy_hero_id)?;
    ensure_opt_ref::<Version>(&state.store, input.version_id.as_ref())?;

    let mut matchup = Matchup::new(
        input.version_id,
        input.position,
        input.hero_id,
        input.enemy_hero_id,
        input.win_rate,
    );
    matchup.note = input.note;

    let pair = state
        .store
        .modify(|rows: &mut Vec<Matchup>| Ok(store_pair(rows, &matchup)))?;
    tracing::info!(
        "Saved {} matchup {} vs {} at {:.1}%",
        matchup.position,
        matchup.hero_id,
        matchup.enemy_hero_id,
        matchup.win_rate
    );
    Ok((StatusCode::CREATED, Json(pair)))
}

/// Change the win rate and note; the mirror follows. A missing mirror is
/// recreated.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MatchupUpdate>,
) -> Result<Json<MatchupPair>, ApiError> {
    check_win_rate(input.win_rate)?;
    let id = EntityId::from(id);

    let pair = state.store.modify(|rows: &mut Vec<Matchup>| {
        let Some(existing) = rows.iter().find(|m| m.id == id) else {
            return Err(StorageError::NotFound {
                table: "matchups",
                id: id.to_string(),
            });
        };
        let mut matchup = existing.clone();
        matchup.win_rate = input.win_rate;
        matchup.note = input.note.clone();
        Ok(store_pair(rows, &matchup))
    })?;
    Ok(Json(pair))
}

/// Deletes the row and its mirror.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = EntityId::from(id);
    state.store.modify(|rows: &mut Vec<Matchup>| {
        let Some(mirror_id) = rows.iter().find(|m| m.id == id).map(Matchup::mirror_id) else {
            return Err(StorageError::NotFound {
                table: "matchups",
                id: id.to_string(),
            });
        };
        rows.retain(|m| m.id != id && m.id != mirror_id);
        Ok(())
    })?;
    Ok(StatusCode::NO_CONTENT)
}
