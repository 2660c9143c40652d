//! HTTP transport: router, shared state, and request handlers.

use crate::config::Config;
use crate::error::VerifyError;
use crate::middleware::access_filter;
use crate::verify::{VerificationEngine, VerifiedToken};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state, immutable after startup.
pub struct AppState {
    /// Service configuration.
    pub config: Config,
    /// Verification and issuance engine.
    pub engine: VerificationEngine,
}

impl AppState {
    /// Build state from configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let engine = VerificationEngine::new(&config);
        Self { config, engine }
    }
}

/// Build the service router.
///
/// The access filter wraps the whole router, so preflight and origin policy
/// apply to every path, including ones with no route.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/verify", post(verify))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(state.clone(), access_filter))
        .with_state(state)
}

/// Liveness probe; no auth.
async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Verify a serial key and issue a token.
///
/// The body is inspected as loose JSON rather than a typed struct so that a
/// missing field, a non-string value, and an unparseable body all map to the
/// same 400 response.
async fn verify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<VerifiedToken>, VerifyError> {
    let body = payload.map(|Json(v)| v).unwrap_or(Value::Null);
    let candidate = body
        .get("serialKey")
        .and_then(Value::as_str)
        .ok_or(VerifyError::MalformedRequest)?;

    let verified = state.engine.verify(candidate)?;
    tracing::info!(issued_at = verified.issued_at, "serial key verified, token issued");

    Ok(Json(verified))
}
