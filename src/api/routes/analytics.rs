use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::parse_role;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{
    self, combo_stats, duo_synergy, hero_stats, lane_matchups, AnalyticsFilter, DraftDataset,
};
use crate::models::{
    ComboStat, DuoSynergy, EntityId, Hero, HeroCombo, HeroId, HeroStat, LaneMatchupStat,
    Matchup, Team, TeamId, TeamPool, TournamentId, VersionId,
};

// ── Hero Statistics ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HeroStatsResponse {
    pub total_games: u32,
    pub decided_games: u32,
    pub heroes: Vec<HeroStat>,
}

pub async fn heroes(
    State(state): State<AppState>,
    Query(filter): Query<AnalyticsFilter>,
) -> Result<Json<HeroStatsResponse>, ApiError> {
    let dataset = DraftDataset::load(&state.store, &filter)?;

    Ok(Json(HeroStatsResponse {
        total_games: dataset.games.len() as u32,
        decided_games: dataset.decided_games().count() as u32,
        heroes: hero_stats(&dataset),
    }))
}

// ── Synergy ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SynergyParams {
    pub version_id: Option<VersionId>,
    pub tournament_id: Option<TournamentId>,
    pub team_id: Option<TeamId>,

    /// Only pairs containing this hero
    pub hero_id: Option<HeroId>,
    pub min_games: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SynergyResponse {
    pub min_games: u32,
    pub pairs: Vec<DuoSynergy>,
}

pub async fn synergy(
    State(state): State<AppState>,
    Query(params): Query<SynergyParams>,
) -> Result<Json<SynergyResponse>, ApiError> {
    let min_games = params
        .min_games
        .unwrap_or(state.config.analytics.min_synergy_games)
        .max(1);
    let filter = AnalyticsFilter {
        version_id: params.version_id,
        tournament_id: params.tournament_id,
        team_id: params.team_id,
    };
    let dataset = DraftDataset::load(&state.store, &filter)?;

    Ok(Json(SynergyResponse {
        min_games,
        pairs: duo_synergy(&dataset, min_games, params.hero_id.as_ref()),
    }))
}

// ── Stored Combos ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ComboStatsResponse {
    pub combos: Vec<ComboStat>,
}

pub async fn combos(
    State(state): State<AppState>,
    Query(filter): Query<AnalyticsFilter>,
) -> Result<Json<ComboStatsResponse>, ApiError> {
    let tracked: Vec<HeroCombo> = state.store.list_where(|c: &HeroCombo| {
        filter.version_id.is_none() || c.version_id.is_none() || c.version_id == filter.version_id
    })?;
    let dataset = DraftDataset::load(&state.store, &filter)?;

    Ok(Json(ComboStatsResponse {
        combos: combo_stats(&dataset, &tracked),
    }))
}

// ── Lane Matchups ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchupParams {
    pub hero_id: Option<HeroId>,
    pub role: Option<String>,
    pub version_id: Option<VersionId>,
    pub tournament_id: Option<TournamentId>,
}

#[derive(Debug, Serialize)]
pub struct MatchupAnalysisResponse {
    pub hero_id: HeroId,
    pub hero_name: String,

    /// Observed in recorded drafts
    pub observed: Vec<LaneMatchupStat>,

    /// Entered by staff
    pub recorded: Vec<Matchup>,
}

pub async fn matchups(
    State(state): State<AppState>,
    Query(params): Query<MatchupParams>,
) -> Result<Json<MatchupAnalysisResponse>, ApiError> {
    let Some(hero_id) = params.hero_id else {
        return Err(ApiError::BadRequest("hero_id is required".to_string()));
    };
    let role = parse_role(params.role.as_deref())?;
    let hero: Hero = state.store.require(&hero_id)?;

    let filter = AnalyticsFilter {
        version_id: params.version_id.clone(),
        tournament_id: params.tournament_id,
        team_id: None,
    };
    let dataset = DraftDataset::load(&state.store, &filter)?;

    let mut recorded: Vec<Matchup> = state.store.list_where(|m: &Matchup| {
        m.hero_id == hero.id
            && role.map_or(true, |r| m.position == r)
            && (params.version_id.is_none() || m.version_id == params.version_id)
    })?;
    recorded.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));

    Ok(Json(MatchupAnalysisResponse {
        observed: lane_matchups(&dataset, &hero.id, role),
        recorded,
        hero_id: hero.id,
        hero_name: hero.name,
    }))
}

// ── Team Pools ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TeamPoolParams {
    pub version_id: Option<VersionId>,
    pub tournament_id: Option<TournamentId>,
}

#[derive(Debug, Serialize)]
pub struct TeamPoolResponse {
    pub team: Team,
    pub pool: TeamPool,
}

pub async fn team_pool(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Query(params): Query<TeamPoolParams>,
) -> Result<Json<TeamPoolResponse>, ApiError> {
    let team: Team = state.store.require(&EntityId::from(team_id))?;
    let filter = AnalyticsFilter {
        version_id: params.version_id,
        tournament_id: params.tournament_id,
        team_id: Some(team.id.clone()),
    };
    let dataset = DraftDataset::load(&state.store, &filter)?;

    Ok(Json(TeamPoolResponse {
        pool: calculate::team_pool(&dataset, &team.id),
        team,
    }))
}
