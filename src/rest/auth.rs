//! Bearer-token guard for the REST API.
//!
//! Auth is opt-in: when no token is configured every request passes, which
//! is the expected setup for trusted-loopback deployments.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppContext;

/// Validate a `Bearer <token>` authorization string against the expected token.
/// Returns `true` if the header value is exactly `"Bearer {expected_token}"`.
pub fn validate_bearer(header_value: &str, expected_token: &str) -> bool {
    header_value
        .strip_prefix("Bearer ")
        .map(|t| t == expected_token)
        .unwrap_or(false)
}

/// Middleware: reject guarded requests without the configured bearer token.
pub async fn require_bearer(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let Some(expected) = ctx.config.api_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if validate_bearer(header_value, expected) {
        Ok(next.run(request).await)
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid or missing authentication token" })),
        ))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_bearer_matches() {
        assert!(validate_bearer("Bearer secret123", "secret123"));
    }

    #[test]
    fn wrong_token_fails() {
        assert!(!validate_bearer("Bearer nope", "secret123"));
    }

    #[test]
    fn missing_prefix_fails() {
        assert!(!validate_bearer("secret123", "secret123"));
        assert!(!validate_bearer("bearer secret123", "secret123"));
    }

    #[test]
    fn empty_header_fails() {
        assert!(!validate_bearer("", "secret123"));
    }
}
