//! HTTP route handlers and the route table.
//!
//! Every route is an exact path and accepts any method. Only [`exit`] (always)
//! and [`cpu`] (in unified gate mode) consult the [`crate::auth::TokenGate`];
//! everything else is public.

pub mod cache;
pub mod cpu;
pub mod exit;
pub mod headers;
pub mod health;
pub mod ip;
pub mod root;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::state::AppState;
use crate::util::to_indented_json;

/// Body of every 404.
pub const NOT_FOUND_BODY: &str = "404 page not found\n";

/// Build the fixed route table. Nothing is registered after this returns.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(root::root))
        .route("/cache", any(cache::cache))
        .route("/cpu", any(cpu::cpu))
        .route("/exit", any(exit::exit))
        .route("/headers", any(headers::headers))
        .route("/health", any(health::health))
        .route("/ip", any(ip::ip))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Fallback for any path outside the route table.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

/// 200 response carrying `value` as four-space-indented JSON.
pub(crate) fn indented_json<T: Serialize + ?Sized>(value: &T) -> Response {
    match to_indented_json(value) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!("Failed to serialize response: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
