use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{delete_existing, ensure_opt_ref, required_text};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{DraftMatch, EntityId, Tournament, Version, VersionId, WinCondition};
use crate::storage::Store;

#[derive(Debug, Deserialize)]
pub struct ListTournamentsParams {
    pub version_id: Option<VersionId>,
}

#[derive(Debug, Serialize)]
pub struct TournamentListResponse {
    pub tournaments: Vec<Tournament>,
}

#[derive(Debug, Deserialize)]
pub struct TournamentInput {
    pub name: String,
    pub version_id: Option<VersionId>,
    pub region: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TournamentInput {
    fn apply(self, store: &Store, tournament: &mut Tournament) -> Result<(), ApiError> {
        ensure_opt_ref::<Version>(store, self.version_id.as_ref())?;
        tournament.name = required_text("name", &self.name)?;
        tournament.version_id = self.version_id;
        tournament.region = self.region.filter(|r| !r.trim().is_empty());
        tournament.start_date = self.start_date;
        tournament.end_date = self.end_date;

        if !tournament.dates_valid() {
            return Err(ApiError::BadRequest(
                "end_date must not be before start_date".to_string(),
            ));
        }
        Ok(())
    }
}

/// Most recent first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListTournamentsParams>,
) -> Result<Json<TournamentListResponse>, ApiError> {
    let mut tournaments: Vec<Tournament> = state.store.list_where(|t: &Tournament| {
        params.version_id.is_none() || t.version_id == params.version_id
    })?;
    tournaments.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(Json(TournamentListResponse { tournaments }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tournament>, ApiError> {
    Ok(Json(state.store.require(&EntityId::from(id))?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<TournamentInput>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let mut tournament = Tournament::new(String::new());
    input.apply(&state.store, &mut tournament)?;

    state.store.insert(&tournament)?;
    tracing::info!("Created tournament {} ({})", tournament.name, tournament.id);
    Ok((StatusCode::CREATED, Json(tournament)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TournamentInput>,
) -> Result<Json<Tournament>, ApiError> {
    let mut tournament: Tournament = state.store.require(&EntityId::from(id))?;
    input.apply(&state.store, &mut tournament)?;

    state.store.update(tournament.clone())?;
    Ok(Json(tournament))
}

/// Tournaments with recorded matches or saved win conditions cannot be deleted.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = EntityId::from(id);
    let matches = state
        .store
        .list_where(|m: &DraftMatch| m.tournament_id.as_ref() == Some(&id))?;
    if !matches.is_empty() {
        return Err(ApiError::Conflict(format!(
            "tournament {} still has {} match(es)",
            id,
            matches.len()
        )));
    }
    let scoped = state
        .store
        .list_where(|w: &WinCondition| w.tournament_id.as_ref() == Some(&id))?;
    if !scoped.is_empty() {
        return Err(ApiError::Conflict(format!(
            "tournament {} scopes {} win condition(s)",
            id,
            scoped.len()
        )));
    }

    delete_existing::<Tournament>(&state.store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
