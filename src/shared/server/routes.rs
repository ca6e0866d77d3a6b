use std::{any::Any, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{CONTENT_TYPE, USER_AGENT},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::{json, Value};

use super::state::AppState;
use crate::features::user_details::{ClientDetails, LogRecord};
use crate::shared::error::ApiError;

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub message: &'static str,
    pub id: String,
}

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let path = state.static_dir.join("index.html");

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(CONTENT_TYPE, "text/html; charset=utf-8")], bytes).into_response(),
        Err(e) => {
            error!("Could not serve {}: {}", path.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Could not serve index.html: {e}") })),
            )
                .into_response()
        }
    }
}

pub async fn log_user_details_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LogResponse>, ApiError> {
    if !is_json(&headers) {
        warn!("Rejected request with non-JSON content type");
        return Err(ApiError::Validation("Request content type must be JSON".to_string()));
    }

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected malformed JSON body: {}", e);
        ApiError::Validation(format!("Malformed JSON body: {e}"))
    })?;

    let client = ClientDetails::from_payload(payload, state.validation_mode).map_err(|e| {
        warn!("Rejected payload: {}", e);
        ApiError::Validation(e.to_string())
    })?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let telemetry = state.telemetry.collect().await;
    let record = LogRecord::new(client, user_agent, telemetry);

    let id = state.storage.store(&record).await.map_err(|e| {
        error!("Failed to store log record for session {}: {}", record.session_id, e);
        ApiError::from(e)
    })?;

    info!("Stored log record {} for session {}", id, record.session_id);
    Ok(Json(LogResponse {
        message: "Data sent successfully!",
        id,
    }))
}

/// Accepts `application/json` and `application/*+json`, with parameters.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());

    error!("Request handler panicked: {}", detail);
    ApiError::Internal(detail).into_response()
}
