use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{delete_existing, insert_unique, required_text, update_unique};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{
    DraftMatch, EntityId, HeroCombo, Matchup, Tournament, Version, WinCondition,
};
use crate::storage::{StorageError, Store};

#[derive(Debug, Serialize)]
pub struct VersionListResponse {
    pub versions: Vec<Version>,
}

#[derive(Debug, Deserialize)]
pub struct VersionInput {
    pub name: String,
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_active: bool,
}

/// Mark `id` as the only active version.
fn set_active(store: &Store, id: &EntityId) -> Result<Version, ApiError> {
    let version = store.modify(|rows: &mut Vec<Version>| {
        let Some(target) = rows.iter().find(|v| &v.id == id).cloned() else {
            return Err(StorageError::NotFound {
                table: "versions",
                id: id.to_string(),
            });
        };
        for v in rows.iter_mut() {
            v.is_active = &v.id == id;
        }
        Ok(Version {
            is_active: true,
            ..target
        })
    })?;
    tracing::info!("Active version is now {} ({})", version.name, version.id);
    Ok(version)
}

/// Newest release first; undated versions last.
pub async fn list(State(state): State<AppState>) -> Result<Json<VersionListResponse>, ApiError> {
    let mut versions: Vec<Version> = state.store.list()?;
    versions.sort_by(|a, b| {
        b.release_date
            .cmp(&a.release_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    Ok(Json(VersionListResponse { versions }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Version>, ApiError> {
    Ok(Json(state.store.require(&EntityId::from(id))?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<VersionInput>,
) -> Result<(StatusCode, Json<Version>), ApiError> {
    let version = Version::new(required_text("name", &input.name)?, input.release_date);
    let mut version = insert_unique(&state.store, version)?;
    tracing::info!("Created version {} ({})", version.name, version.id);

    if input.is_active {
        version = set_active(&state.store, &version.id)?;
    }
    Ok((StatusCode::CREATED, Json(version)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<VersionInput>,
) -> Result<Json<Version>, ApiError> {
    let mut version: Version = state.store.require(&EntityId::from(id))?;
    let was_active = version.is_active;
    version.name = required_text("name", &input.name)?;
    version.release_date = input.release_date;
    if !input.is_active {
        version.is_active = false;
    }

    let version = update_unique(&state.store, version)?;
    if input.is_active && !was_active {
        return Ok(Json(set_active(&state.store, &version.id)?));
    }
    if was_active && !input.is_active {
        tracing::info!("Version {} ({}) deactivated", version.name, version.id);
    }
    Ok(Json(version))
}

pub async fn activate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Version>, ApiError> {
    Ok(Json(set_active(&state.store, &EntityId::from(id))?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = EntityId::from(id);
    let store = &state.store;
    let version = Some(&id);

    let referenced = !store
        .list_where(|t: &Tournament| t.version_id.as_ref() == version)?
        .is_empty()
        || !store
            .list_where(|m: &DraftMatch| m.version_id.as_ref() == version)?
            .is_empty()
        || !store
            .list_where(|m: &Matchup| m.version_id.as_ref() == version)?
            .is_empty()
        || !store
            .list_where(|c: &HeroCombo| c.version_id.as_ref() == version)?
            .is_empty()
        || !store
            .list_where(|w: &WinCondition| w.version_id.as_ref() == version)?
            .is_empty();
    if referenced {
        return Err(ApiError::Conflict(format!(
            "version {} is still referenced by recorded data",
            id
        )));
    }

    delete_existing::<Version>(store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
