//! Slow but cacheable response.

use std::time::Duration;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Local;

use crate::state::AppState;

/// `GET /cache` — waits `cache.delay_ms`, then answers with the local time
/// (`YYMMDD_HHMMSS`) and `Cache-Control: public, max-age=<cache.max_age_secs>`.
///
/// The wait only parks this request's task.
pub async fn cache(State(state): State<AppState>) -> Response {
    let cache = &state.config.cache;
    tokio::time::sleep(Duration::from_millis(cache.delay_ms)).await;

    let cache_control = format!("public, max-age={}", cache.max_age_secs);
    let body = Local::now().format("%y%m%d_%H%M%S").to_string();
    ([(header::CACHE_CONTROL, cache_control)], body).into_response()
}
