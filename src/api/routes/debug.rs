use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::DraftGame;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct CountsResponse {
    pub tables: BTreeMap<&'static str, usize>,
    pub games_with_result: usize,
    pub games_without_result: usize,
}

/// Row count of every table.
pub async fn counts(State(state): State<AppState>) -> Result<Json<CountsResponse>, ApiError> {
    let tables = state.store.table_counts()?.into_iter().collect();
    let games: Vec<DraftGame> = state.store.list()?;
    let decided = games.iter().filter(|g| g.winner.is_some()).count();

    Ok(Json(CountsResponse {
        tables,
        games_with_result: decided,
        games_without_result: games.len() - decided,
    }))
}
