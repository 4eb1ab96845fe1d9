//! Saved draft conditions ("our team has X, the enemy lacks Y") and their
//! historical record.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{delete_existing, ensure_opt_ref, ensure_ref, required_text};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{evaluate_win_condition, AnalyticsFilter, DraftDataset};
use crate::models::{
    ConditionRule, EntityId, Hero, TeamId, Tournament, TournamentId, Version, VersionId,
    WinCondition, WinConditionResult,
};
use crate::storage::Store;

#[derive(Debug, Serialize)]
pub struct WinConditionListResponse {
    pub win_conditions: Vec<WinCondition>,
}

#[derive(Debug, Deserialize)]
pub struct WinConditionInput {
    pub name: String,
    pub description: Option<String>,
    pub version_id: Option<VersionId>,
    pub tournament_id: Option<TournamentId>,
    #[serde(default)]
    pub rules: Vec<ConditionRule>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub rules: Vec<ConditionRule>,
    pub version_id: Option<VersionId>,
    pub tournament_id: Option<TournamentId>,
    pub team_id: Option<TeamId>,
}

/// Query overrides for evaluating a saved condition.
#[derive(Debug, Deserialize)]
pub struct EvaluateParams {
    pub version_id: Option<VersionId>,
    pub tournament_id: Option<TournamentId>,
    pub team_id: Option<TeamId>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_condition_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub result: WinConditionResult,
}

fn check_rules(store: &Store, rules: &[ConditionRule]) -> Result<(), ApiError> {
    if rules.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one rule is required".to_string(),
        ));
    }
    for rule in rules {
        ensure_ref::<Hero>(store, &rule.hero_id)?;
    }
    Ok(())
}

impl WinConditionInput {
    fn apply(self, store: &Store, condition: &mut WinCondition) -> Result<(), ApiError> {
        check_rules(store, &self.rules)?;
        ensure_opt_ref::<Version>(store, self.version_id.as_ref())?;
        ensure_opt_ref::<Tournament>(store, self.tournament_id.as_ref())?;

        condition.name = required_text("name", &self.name)?;
        condition.description = self.description;
        condition.version_id = self.version_id;
        condition.tournament_id = self.tournament_id;
        condition.rules = self.rules;
        Ok(())
    }
}

fn evaluate(
    store: &Store,
    filter: &AnalyticsFilter,
    rules: &[ConditionRule],
) -> Result<WinConditionResult, ApiError> {
    let dataset = DraftDataset::load(store, filter)?;
    evaluate_win_condition(&dataset, rules).map_err(|e| ApiError::BadRequest(e.to_string()))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<WinConditionListResponse>, ApiError> {
    let mut win_conditions: Vec<WinCondition> = state.store.list()?;
    win_conditions.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(Json(WinConditionListResponse { win_conditions }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WinCondition>, ApiError> {
    Ok(Json(state.store.require(&EntityId::from(id))?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<WinConditionInput>,
) -> Result<(StatusCode, Json<WinCondition>), ApiError> {
    let mut condition = WinCondition::new(String::new(), Vec::new());
    input.apply(&state.store, &mut condition)?;

    state.store.insert(&condition)?;
    tracing::info!(
        "Saved win condition {} with {} rule(s)",
        condition.name,
        condition.rules.len()
    );
    Ok((StatusCode::CREATED, Json(condition)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<WinConditionInput>,
) -> Result<Json<WinCondition>, ApiError> {
    let mut condition: WinCondition = state.store.require(&EntityId::from(id))?;
    input.apply(&state.store, &mut condition)?;

    state.store.update(condition.clone())?;
    Ok(Json(condition))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_existing::<WinCondition>(&state.store, &EntityId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Evaluate ad-hoc rules without saving them.
pub async fn evaluate_rules(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    check_rules(&state.store, &request.rules)?;
    let filter = AnalyticsFilter {
        version_id: request.version_id,
        tournament_id: request.tournament_id,
        team_id: request.team_id,
    };

    Ok(Json(EvaluationResponse {
        win_condition_id: None,
        name: None,
        result: evaluate(&state.store, &filter, &request.rules)?,
    }))
}

/// Evaluate a saved condition under its own scope, or the query's.
pub async fn evaluate_saved(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<EvaluateParams>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let condition: WinCondition = state.store.require(&EntityId::from(id))?;
    let filter = AnalyticsFilter {
        version_id: params.version_id.or_else(|| condition.version_id.clone()),
        tournament_id: params
            .tournament_id
            .or_else(|| condition.tournament_id.clone()),
        team_id: params.team_id,
    };

    let result = evaluate(&state.store, &filter, &condition.rules)?;
    tracing::debug!(
        "Win condition {} matched {} of {} games",
        condition.name,
        result.matches_found,
        result.games_scanned
    );
    Ok(Json(EvaluationResponse {
        win_condition_id: Some(condition.id),
        name: Some(condition.name),
        result,
    }))
}
