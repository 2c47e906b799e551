use std::sync::Arc;

use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use taskboard_core::ServiceError;

use crate::service::AuthService;

/// Paths that don't require authentication.
const PUBLIC_PATHS: &[&str] = &[
    "/auth/register",
    "/auth/login",
    "/auth/refresh",
    "/auth/logout",
    "/health",
    "/version",
];

/// JWT authentication middleware.
///
/// Checks for a Bearer token in the Authorization header. Public paths
/// (register, login, token exchange) are excluded. On success the resolved
/// [`crate::model::Principal`] is stored as a request extension for
/// handlers to pick up via `Extension<Principal>`.
pub async fn auth_middleware(
    State(svc): State<Arc<AuthService>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if is_public_path(&path) {
        return next.run(req).await;
    }

    let token = match extract_bearer(req.headers()) {
        Some(t) => t.to_string(),
        None => {
            return ServiceError::Unauthorized("Missing authorization header".into())
                .into_response();
        }
    };

    match svc.resolve(&token) {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(e) => ServiceError::from(e).into_response(),
    }
}

/// Extract the Bearer token from the Authorization header.
fn extract_bearer(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Check if a path is public (no auth required).
fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|p| path == *p || path == format!("{}/", p).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/auth/login"));
        assert!(is_public_path("/auth/login/"));
        assert!(is_public_path("/health"));
        assert!(!is_public_path("/me/user"));
        assert!(!is_public_path("/auth/loginx"));
    }

    #[test]
    fn test_extract_bearer() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Some("abc.def.ghi"));

        let mut headers = axum::http::HeaderMap::new();
        headers.insert("authorization", "Basic dXNlcg==".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);
    }
}
