//! REST API endpoints.
//!
//! Axum-based HTTP API for recording drafts, managing hero/version/
//! tournament metadata and running the draft analytics.

pub mod auth;
pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::draft::DraftReport;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid draft: {} issue(s)", .0.issues.len())]
    InvalidDraft(DraftReport),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StorageError::Duplicate { .. } => ApiError::Conflict(err.to_string()),
            StorageError::Io(_) | StorageError::Json(_) => ApiError::Internal(err.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) | ApiError::InvalidDraft(_) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST")
            }
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        let details = match &self {
            ApiError::InvalidDraft(report) => serde_json::to_value(report).ok(),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(50).clamp(1, 100),
        }
    }

    /// Index of the first item on this page, saturating on huge pages.
    pub fn offset(&self) -> usize {
        (self.page as usize)
            .saturating_sub(1)
            .saturating_mul(self.page_size as usize)
    }

    /// The slice of `items` on this page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start
            .saturating_add(self.page_size as usize)
            .min(items.len());
        &items[start..end]
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(pagination.page_size);
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("Invalid CORS origin {:?}, allowing any", origin);
            layer.allow_origin(Any)
        }
    }
}

/// Build the full HTTP router.
pub fn build_router(state: AppState) -> Router {
    use routes::{
        analytics, combos, debug, drafts, heroes, matches, matchups, players, teams,
        tournaments, versions, win_conditions,
    };

    let api = Router::new()
        .route("/health", get(debug::health))
        .route("/debug/counts", get(debug::counts))
        .route("/draft/sequence", get(drafts::sequence))
        .route("/draft/validate", post(drafts::validate))
        .route("/heroes", get(heroes::list).post(heroes::create))
        .route(
            "/heroes/:id",
            get(heroes::show).put(heroes::update).delete(heroes::remove),
        )
        .route("/versions", get(versions::list).post(versions::create))
        .route(
            "/versions/:id",
            get(versions::show)
                .put(versions::update)
                .delete(versions::remove),
        )
        .route("/versions/:id/activate", post(versions::activate))
        .route(
            "/tournaments",
            get(tournaments::list).post(tournaments::create),
        )
        .route(
            "/tournaments/:id",
            get(tournaments::show)
                .put(tournaments::update)
                .delete(tournaments::remove),
        )
        .route("/teams", get(teams::list).post(teams::create))
        .route(
            "/teams/:id",
            get(teams::show).put(teams::update).delete(teams::remove),
        )
        .route("/players", get(players::list).post(players::create))
        .route(
            "/players/:id",
            get(players::show).put(players::update).delete(players::remove),
        )
        .route("/matches", get(matches::list).post(matches::create))
        .route(
            "/matches/:id",
            get(matches::show).put(matches::update).delete(matches::remove),
        )
        .route(
            "/matches/:id/games",
            get(matches::list_games).post(matches::create_game),
        )
        .route(
            "/games/:id",
            get(matches::show_game)
                .put(matches::update_game)
                .delete(matches::remove_game),
        )
        .route("/matchups", get(matchups::list).post(matchups::create))
        .route(
            "/matchups/:id",
            axum::routing::put(matchups::update).delete(matchups::remove),
        )
        .route("/combos", get(combos::list).post(combos::create))
        .route("/combos/:id", axum::routing::delete(combos::remove))
        .route(
            "/win-conditions",
            get(win_conditions::list).post(win_conditions::create),
        )
        .route("/win-conditions/evaluate", post(win_conditions::evaluate_rules))
        .route(
            "/win-conditions/:id",
            get(win_conditions::show)
                .put(win_conditions::update)
                .delete(win_conditions::remove),
        )
        .route(
            "/win-conditions/:id/evaluate",
            get(win_conditions::evaluate_saved),
        )
        .route("/analytics/heroes", get(analytics::heroes))
        .route("/analytics/synergy", get(analytics::synergy))
        .route("/analytics/combos", get(analytics::combos))
        .route("/analytics/matchups", get(analytics::matchups))
        .route("/analytics/team-pools/:team_id", get(analytics::team_pool))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Helpers for driving the router in tests.

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use super::state::AppState;
    use crate::config::AppConfig;
    use crate::storage::{StorageConfig, Store};

    pub fn test_state(dir: &std::path::Path) -> AppState {
        let store = Store::open(StorageConfig::new(dir.to_path_buf())).unwrap();
        AppState {
            store: Arc::new(store),
            config: Arc::new(AppConfig::default()),
        }
    }

    pub async fn send(
        app: axum::Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri, None).await
    }

    pub async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::DELETE, uri, None).await
    }
}
