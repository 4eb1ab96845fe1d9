use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{delete_existing, ensure_opt_ref, ensure_ref};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{EntityId, Hero, HeroCombo, HeroId, Version, VersionId};
use crate::storage::StorageError;

#[derive(Debug, Deserialize)]
pub struct ListCombosParams {
    pub version_id: Option<VersionId>,
    pub hero_id: Option<HeroId>,
}

#[derive(Debug, Serialize)]
pub struct ComboListResponse {
    pub combos: Vec<HeroCombo>,
}

#[derive(Debug, Deserialize)]
pub struct ComboInput {
    pub hero_a_id: HeroId,
    pub hero_b_id: HeroId,
    pub version_id: Option<VersionId>,
    pub name: Option<String>,
    pub note: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListCombosParams>,
) -> Result<Json<ComboListResponse>, ApiError> {
    let mut combos: Vec<HeroCombo> = state.store.list_where(|c: &HeroCombo| {
        (params.version_id.is_none() || c.version_id == params.version_id)
            && params
                .hero_id
                .as_ref()
                .map_or(true, |h| &c.hero_a_id == h || &c.hero_b_id == h)
    })?;
    combos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(ComboListResponse { combos }))
}

/// The same pair may be tracked once per version.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ComboInput>,
) -> Result<(StatusCode, Json<HeroCombo>), ApiError> {
    if input.hero_a_id == input.hero_b_id {
        return Err(ApiError::BadRequest(
            "a combo needs two different heroes".to_string(),
        ));
    }
    ensure_ref::<Hero>(&state.store, &input.hero_a_id)?;
    ensure_ref::<Hero>(&state.store, &input.hero_b_id)?;
    ensure_opt_ref::<Version>(&state.store, input.version_id.as_ref())?;

    let mut combo = HeroCombo::new(input.hero_a_id, input.hero_b_id);
    combo.version_id = input.version_id;
    combo.name = input.name.filter(|n| !n.trim().is_empty());
    combo.note = input.note;

    state.store.modify(|rows: &mut Vec<HeroCombo>| {
        if rows.iter().any(|c| c.same_pair(&combo)) {
            return Err(StorageError::Duplicate {
                table: "hero_combos",
                id: format!("{} + {}", combo.hero_a_id, combo.hero_b_id),
            });
        }
        rows.push(combo.clone());
        Ok(())
    })?;
    tracing::info!("Tracking combo {} + {}", combo.hero_a_id, combo.hero_b_id);
    Ok((StatusCode::CREATED, Json(combo)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_existing::<HeroCombo>(&state.store, &EntityId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{delete, get_json, post_json, test_state};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_combo_pairs_are_unordered_and_unique() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()));
        let (_, a) = post_json(app.clone(), "/api/heroes", json!({"name": "Alice"})).await;
        let (_, b) = post_json(app.clone(), "/api/heroes", json!({"name": "Violet"})).await;
        let (a, b) = (a["id"].as_str().unwrap(), b["id"].as_str().unwrap());

        let (status, combo) = post_json(
            app.clone(),
            "/api/combos",
            json!({"hero_a_id": a, "hero_b_id": b, "name": "Sun and shield"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = post_json(
            app.clone(),
            "/api/combos",
            json!({"hero_a_id": b, "hero_b_id": a}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = post_json(
            app.clone(),
            "/api/combos",
            json!({"hero_a_id": a, "hero_b_id": a}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, json) = get_json(app.clone(), &format!("/api/combos?hero_id={}", b)).await;
        assert_eq!(json["combos"].as_array().unwrap().len(), 1);

        let uri = format!("/api/combos/{}", combo["id"].as_str().unwrap());
        let (status, _) = delete(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = delete(app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
