use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{delete_existing, insert_unique, required_text, update_unique};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{DraftMatch, EntityId, Player, Team};

#[derive(Debug, Serialize)]
pub struct TeamListResponse {
    pub teams: Vec<Team>,
}

#[derive(Debug, Serialize)]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: Team,
    pub players: Vec<Player>,
}

#[derive(Debug, Deserialize)]
pub struct TeamInput {
    pub name: String,
    pub short_name: Option<String>,
    pub region: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn list(State(state): State<AppState>) -> Result<Json<TeamListResponse>, ApiError> {
    let mut teams: Vec<Team> = state.store.list()?;
    teams.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(Json(TeamListResponse { teams }))
}

/// The team with its current roster.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeamDetail>, ApiError> {
    let team: Team = state.store.require(&EntityId::from(id))?;
    let mut players: Vec<Player> = state
        .store
        .list_where(|p: &Player| p.team_id.as_ref() == Some(&team.id))?;
    players.sort_by(|a, b| a.role.cmp(&b.role).then_with(|| a.name.cmp(&b.name)));

    Ok(Json(TeamDetail { team, players }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<TeamInput>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let mut team = Team::new(required_text("name", &input.name)?);
    team.short_name = non_blank(input.short_name);
    team.region = non_blank(input.region);

    let team = insert_unique(&state.store, team)?;
    tracing::info!("Created team {} ({})", team.name, team.id);
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TeamInput>,
) -> Result<Json<Team>, ApiError> {
    let mut team: Team = state.store.require(&EntityId::from(id))?;
    team.name = required_text("name", &input.name)?;
    team.short_name = non_blank(input.short_name);
    team.region = non_blank(input.region);

    Ok(Json(update_unique(&state.store, team)?))
}

/// Teams with recorded matches cannot be deleted. Players of a deleted team
/// become free agents.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = EntityId::from(id);
    let matches = state.store.list_where(|m: &DraftMatch| m.involves(&id))?;
    if !matches.is_empty() {
        return Err(ApiError::Conflict(format!(
            "team {} has played {} recorded match(es)",
            id,
            matches.len()
        )));
    }

    delete_existing::<Team>(&state.store, &id)?;
    let released = state.store.modify(|players: &mut Vec<Player>| {
        let mut released = 0;
        for p in players.iter_mut().filter(|p| p.team_id.as_ref() == Some(&id)) {
            p.team_id = None;
            released += 1;
        }
        Ok(released)
    })?;
    if released > 0 {
        tracing::info!("Released {} player(s) from deleted team {}", released, id);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{delete, get_json, post_json, test_state};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_team_roster_and_delete() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()));

        let (status, team) = post_json(
            app.clone(),
            "/api/teams",
            json!({"name": "Buriram United", "short_name": "BRU"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let team_id = team["id"].as_str().unwrap().to_string();

        let (_, player) = post_json(
            app.clone(),
            "/api/players",
            json!({"name": "Stup1d", "team_id": team_id, "role": "mid"}),
        )
        .await;

        let uri = format!("/api/teams/{}", team_id);
        let (_, detail) = get_json(app.clone(), &uri).await;
        assert_eq!(detail["short_name"], "BRU");
        assert_eq!(detail["players"][0]["name"], "Stup1d");

        let (status, _) = delete(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, player) = get_json(
            app,
            &format!("/api/players/{}", player["id"].as_str().unwrap()),
        )
        .await;
        assert!(player.get("team_id").is_none());
    }

    #[tokio::test]
    async fn test_team_names_unique() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()));

        post_json(app.clone(), "/api/teams", json!({"name": "Talon"})).await;
        let (status, _) = post_json(app, "/api/teams", json!({"name": "TALON "})).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
