use crate::api::ErrorResponse;
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AuthGuard {
    expected_token: Arc<str>,
}

impl AuthGuard {
    pub fn new(expected_token: &str) -> Self {
        Self {
            expected_token: Arc::from(expected_token),
        }
    }

    /// The second whitespace-separated token of the header must equal the
    /// expected token. The scheme word is not checked. An empty expected token
    /// matches nothing.
    pub fn is_authorized(&self, header: Option<&HeaderValue>) -> bool {
        if self.expected_token.is_empty() {
            return false;
        }

        header
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split_whitespace().nth(1))
            .is_some_and(|token| token == &*self.expected_token)
    }
}

pub async fn require_bearer_token(State(guard): State<AuthGuard>, req: Request, next: Next) -> Response {
    if !guard.is_authorized(req.headers().get(AUTHORIZATION)) {
        tracing::error!("Unauthorized request to path: {}", req.uri().path());
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Unauthorized request")),
        )
            .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(guard: &AuthGuard, header: Option<&'static str>) -> bool {
        let value = header.map(HeaderValue::from_static);
        guard.is_authorized(value.as_ref())
    }

    #[test]
    fn test_matching_bearer_token() {
        let guard = AuthGuard::new("s3cret");
        assert!(check(&guard, Some("Bearer s3cret")));
        assert!(check(&guard, Some("Bearer   s3cret")));
    }

    #[test]
    fn test_scheme_is_not_inspected() {
        let guard = AuthGuard::new("s3cret");
        assert!(check(&guard, Some("Token s3cret")));
    }

    #[test]
    fn test_rejects_missing_or_wrong_token() {
        let guard = AuthGuard::new("s3cret");
        assert!(!check(&guard, None));
        assert!(!check(&guard, Some("")));
        assert!(!check(&guard, Some("Bearer")));
        assert!(!check(&guard, Some("s3cret")));
        assert!(!check(&guard, Some("Bearer wrong")));
        assert!(!check(&guard, Some("Bearer s3cret2")));
        assert!(!check(&guard, Some("Bearer S3CRET")));
    }

    #[test]
    fn test_empty_expected_token_fails_closed() {
        let guard = AuthGuard::new("");
        assert!(!check(&guard, None));
        assert!(!check(&guard, Some("Bearer")));
        assert!(!check(&guard, Some("Bearer ")));
        assert!(!check(&guard, Some("Bearer anything")));
    }

    #[test]
    fn test_non_ascii_header_is_rejected() {
        let guard = AuthGuard::new("s3cret");
        let value = HeaderValue::from_bytes(b"Bearer s3cret\xff").unwrap();
        assert!(!guard.is_authorized(Some(&value)));
    }
}
