//! Paste HTTP handlers.

use super::parse;
use crate::{error::HttpError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fadebin_core::models::paste::{CreatedPaste, PasteDetails, ViewedPaste};
use hyper::HeaderMap;
use serde_json::Value;

/// Header carrying the deterministic time override. Honored only when the
/// process runs in test mode; production ignores it entirely.
pub const NOW_OVERRIDE_HEADER: &str = "x-fadebin-now";

fn resolved_now(state: &AppState, headers: &HeaderMap) -> i64 {
    let raw = headers
        .get(NOW_OVERRIDE_HEADER)
        .and_then(|value| value.to_str().ok());
    state.clock.now_ms(raw)
}

/// Create a new paste.
///
/// # Arguments
/// - `state`: Application state.
/// - `headers`: Request headers (time override channel).
/// - `body`: Raw JSON creation payload.
///
/// # Returns
/// `201 Created` with the identifier and creation metadata.
///
/// # Errors
/// Returns an error if validation or persistence fails.
pub async fn create_paste(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<CreatedPaste>), HttpError> {
    let params = parse::create_params(&body)?;
    let now = resolved_now(&state, &headers);
    let created = state.service.create(params, now).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch a paste, consuming one view from its budget.
///
/// # Arguments
/// - `state`: Application state.
/// - `id`: Paste identifier from the path.
///
/// # Returns
/// Content plus the post-decrement view budget as JSON.
///
/// # Errors
/// Returns an error if the paste is unknown, expired, or exhausted.
pub async fn fetch_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ViewedPaste>, HttpError> {
    let now = resolved_now(&state, &headers);
    Ok(Json(state.service.fetch_counted(&id, now).await?))
}

/// Fetch a paste without consuming its view budget.
///
/// # Arguments
/// - `state`: Application state.
/// - `id`: Paste identifier from the path.
///
/// # Returns
/// Content plus unchanged metadata as JSON.
///
/// # Errors
/// Returns an error if the paste is unknown, expired, or exhausted.
pub async fn fetch_paste_meta(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PasteDetails>, HttpError> {
    let now = resolved_now(&state, &headers);
    Ok(Json(state.service.fetch_metadata(&id, now).await?))
}

/// Liveness probe reporting the storage strategy selected at startup.
pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "store": state.store.kind().as_str(),
    }))
}
