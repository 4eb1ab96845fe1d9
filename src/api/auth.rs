//! Admin password check for mutating requests.
//!
//! Reads stay open. `POST`, `PUT` and `DELETE` must carry the configured
//! admin password in `x-admin-password` or as a bearer token.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;
use sha2::{Digest, Sha256};

use super::state::AppState;
use super::ApiError;

pub const ADMIN_HEADER: &str = "x-admin-password";

/// Password sent with the request, if any.
pub fn presented_password(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(ADMIN_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(value);
    }
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Compare digests so the comparison does not leak the secret's length.
pub fn passwords_match(provided: &str, expected: &str) -> bool {
    Sha256::digest(provided.as_bytes()) == Sha256::digest(expected.as_bytes())
}

fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if is_read_only(request.method()) {
        return Ok(next.run(request).await);
    }
    let Some(expected) = state.config.admin.password.as_deref() else {
        return Ok(next.run(request).await);
    };

    let verdict = presented_password(request.headers()).map(|p| passwords_match(p, expected));
    match verdict {
        Some(true) => Ok(next.run(request).await),
        Some(false) => {
            tracing::warn!(
                "Rejected {} {}: wrong admin password",
                request.method(),
                request.uri()
            );
            Err(ApiError::Unauthorized("wrong admin password".to_string()))
        }
        None => Err(ApiError::Unauthorized(
            "admin password required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::api::test_support::test_state;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    #[test]
    fn test_presented_password_sources() {
        let mut headers = HeaderMap::new();
        assert_eq!(presented_password(&headers), None);

        headers.insert("authorization", "Bearer s3cret".parse().unwrap());
        assert_eq!(presented_password(&headers), Some("s3cret"));

        headers.insert(ADMIN_HEADER, "other".parse().unwrap());
        assert_eq!(presented_password(&headers), Some("other"));
    }

    #[test]
    fn test_passwords_match() {
        assert!(passwords_match("abc", "abc"));
        assert!(!passwords_match("abc", "abd"));
        assert!(!passwords_match("", "abc"));
    }

    fn locked_app(dir: &std::path::Path) -> axum::Router {
        let mut state = test_state(dir);
        let mut config = AppConfig::default();
        config.admin.password = Some("s3cret".to_string());
        state.config = Arc::new(config);
        build_router(state)
    }

    fn create_hero(password: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/heroes")
            .header("content-type", "application/json");
        if let Some(p) = password {
            builder = builder.header(ADMIN_HEADER, p);
        }
        builder
            .body(Body::from(r#"{"name":"Zill","roles":["mid"]}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn test_writes_need_password() {
        let tmp = tempfile::tempdir().unwrap();

        let resp = locked_app(tmp.path()).oneshot(create_hero(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = locked_app(tmp.path())
            .oneshot(create_hero(Some("nope")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = locked_app(tmp.path())
            .oneshot(create_hero(Some("s3cret")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_reads_stay_open() {
        let tmp = tempfile::tempdir().unwrap();
        let resp = locked_app(tmp.path())
            .oneshot(Request::builder().uri("/api/heroes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
