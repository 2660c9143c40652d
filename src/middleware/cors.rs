//! Origin-based access filter.
//!
//! Every request passes through this filter before reaching a handler. The
//! filter never errors on malformed input: an absent or unreadable `Origin`
//! header simply fails the allow check unless allow-all mode is active.
//!
//! Outcomes:
//! - `OPTIONS` preflight: answered immediately, 204 when allowed, 403 when
//!   not; handlers are never invoked.
//! - Allowed requests: forwarded, with CORS headers attached to the response.
//! - Disallowed `GET`/`HEAD`: forwarded without CORS headers, so same-origin
//!   and non-browser callers still get data.
//! - Any other disallowed method: rejected with 403.

use crate::error::VerifyError;
use crate::http::AppState;
use axum::extract::{Request, State};
use axum::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Access filter middleware; see the module docs for the contract.
pub async fn access_filter(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let allowed = state.config.origin_policy.is_allowed(origin.as_deref());
    let method = request.method().clone();

    if method == Method::OPTIONS {
        if !allowed {
            tracing::debug!(origin = origin.as_deref(), "preflight rejected");
            return StatusCode::FORBIDDEN.into_response();
        }
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut(), origin.as_deref());
        return response;
    }

    if !allowed && method != Method::GET && method != Method::HEAD {
        tracing::debug!(origin = origin.as_deref(), %method, "origin rejected");
        return VerifyError::OriginRejected.into_response();
    }

    let mut response = next.run(request).await;
    if allowed {
        apply_cors_headers(response.headers_mut(), origin.as_deref());
    }
    response
}

/// Attach cross-origin response headers.
///
/// Echoes the caller's origin when one was sent; the wildcard only appears
/// for origin-less requests in allow-all mode, never for an explicit
/// allow-list. `Vary: Origin` keeps shared caches from serving one origin's
/// response to another.
fn apply_cors_headers(headers: &mut HeaderMap, origin: Option<&str>) {
    let allow_origin = origin
        .and_then(|o| HeaderValue::from_str(o).ok())
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, GET, OPTIONS"),
    );
    headers.insert(VARY, HeaderValue::from_static("Origin"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_headers_echo_origin() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, Some("https://good.example"));

        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://good.example"
        );
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "Content-Type"
        );
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "POST, GET, OPTIONS"
        );
        assert_eq!(headers.get(VARY).unwrap(), "Origin");
    }

    #[test]
    fn test_cors_headers_wildcard_without_origin() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, None);
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }
}
