use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{delete_existing, ensure_opt_ref, required_text};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{DraftPick, EntityId, Player, Role, Team, TeamId};

#[derive(Debug, Deserialize)]
pub struct ListPlayersParams {
    pub team_id: Option<TeamId>,
}

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<Player>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerInput {
    pub name: String,
    pub team_id: Option<TeamId>,
    pub role: Option<Role>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListPlayersParams>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let mut players: Vec<Player> = state.store.list_where(|p: &Player| {
        params.team_id.is_none() || p.team_id == params.team_id
    })?;
    players.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(Json(PlayerListResponse { players }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    Ok(Json(state.store.require(&EntityId::from(id))?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<PlayerInput>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    ensure_opt_ref::<Team>(&state.store, input.team_id.as_ref())?;
    let player = Player::new(required_text("name", &input.name)?, input.team_id, input.role);

    state.store.insert(&player)?;
    tracing::info!("Created player {} ({})", player.name, player.id);
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PlayerInput>,
) -> Result<Json<Player>, ApiError> {
    let mut player: Player = state.store.require(&EntityId::from(id))?;
    ensure_opt_ref::<Team>(&state.store, input.team_id.as_ref())?;
    player.name = required_text("name", &input.name)?;
    player.team_id = input.team_id;
    player.role = input.role;

    state.store.update(player.clone())?;
    Ok(Json(player))
}

/// Draft picks credited to the player keep the hero but lose the player.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = EntityId::from(id);
    delete_existing::<Player>(&state.store, &id)?;

    state.store.modify(|picks: &mut Vec<DraftPick>| {
        for pick in picks
            .iter_mut()
            .filter(|p| p.player_id.as_ref() == Some(&id))
        {
            pick.player_id = None;
        }
        Ok(())
    })?;
    Ok(StatusCode::NO_CONTENT)
}
