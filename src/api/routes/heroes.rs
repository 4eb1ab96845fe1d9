use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{delete_existing, insert_unique, parse_role, required_text, update_unique};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{DraftPick, EntityId, Hero, HeroCombo, Matchup, Role, WinCondition};

#[derive(Debug, Deserialize)]
pub struct ListHeroesParams {
    pub role: Option<String>,

    /// Case-insensitive name search
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HeroListResponse {
    pub heroes: Vec<Hero>,
}

#[derive(Debug, Deserialize)]
pub struct HeroInput {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub image_url: Option<String>,
}

fn dedup_roles(mut roles: Vec<Role>) -> Vec<Role> {
    roles.sort();
    roles.dedup();
    roles
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListHeroesParams>,
) -> Result<Json<HeroListResponse>, ApiError> {
    let role = parse_role(params.role.as_deref())?;
    let needle = params.q.as_deref().map(|q| q.trim().to_lowercase());

    let mut heroes: Vec<Hero> = state.store.list_where(|h: &Hero| {
        role.map_or(true, |r| h.plays(r))
            && needle
                .as_deref()
                .map_or(true, |q| h.name.to_lowercase().contains(q))
    })?;
    heroes.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    Ok(Json(HeroListResponse { heroes }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Hero>, ApiError> {
    Ok(Json(state.store.require(&EntityId::from(id))?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<HeroInput>,
) -> Result<(StatusCode, Json<Hero>), ApiError> {
    let mut hero = Hero::new(required_text("name", &input.name)?, dedup_roles(input.roles));
    hero.image_url = input.image_url;

    let hero = insert_unique(&state.store, hero)?;
    tracing::info!("Created hero {} ({})", hero.name, hero.id);
    Ok((StatusCode::CREATED, Json(hero)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<HeroInput>,
) -> Result<Json<Hero>, ApiError> {
    let mut hero: Hero = state.store.require(&EntityId::from(id))?;
    hero.name = required_text("name", &input.name)?;
    hero.roles = dedup_roles(input.roles);
    hero.image_url = input.image_url;

    Ok(Json(update_unique(&state.store, hero)?))
}

/// Heroes referenced by drafts, matchups, combos or win conditions cannot be
/// deleted.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = EntityId::from(id);
    let store = &state.store;

    let in_drafts = !store.list_where(|p: &DraftPick| p.hero_id == id)?.is_empty();
    let in_matchups = !store
        .list_where(|m: &Matchup| m.hero_id == id || m.enemy_hero_id == id)?
        .is_empty();
    let in_combos = !store
        .list_where(|c: &HeroCombo| c.hero_a_id == id || c.hero_b_id == id)?
        .is_empty();
    let in_conditions = !store
        .list_where(|w: &WinCondition| w.rules.iter().any(|r| r.hero_id == id))?
        .is_empty();

    if in_drafts || in_matchups || in_combos || in_conditions {
        return Err(ApiError::Conflict(format!(
            "hero {} is still referenced by recorded data",
            id
        )));
    }

    delete_existing::<Hero>(store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
