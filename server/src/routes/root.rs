//! Route listing served at `/`.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use crate::routes::not_found;
use crate::state::AppState;
use crate::SOURCE_COMMIT;

/// `GET /` — static HTML listing of the available routes.
///
/// Anything other than exactly `/` is a 404, even if the handler is reached.
pub async fn root(State(state): State<AppState>, uri: Uri) -> Response {
    if uri.path() != "/" {
        return not_found().await;
    }
    (StatusCode::OK, Html(route_listing(&state))).into_response()
}

fn route_listing(state: &AppState) -> String {
    let mode = state.gate.mode();
    let token_header = mode.header_name();
    let cpu_note = if mode.gates_cpu() {
        format!(", requires a token in header {token_header}")
    } else {
        String::new()
    };
    let cache = &state.config.cache;

    format!(
        "<html><pre><b>routes:</b>\n\
         /         root (this route)\n\
         /cache    returns cacheable (max-age={max_age}) but delayed ({delay}ms) response\n\
         /cpu      CPU-intensive operation{cpu_note}\n\
         /exit     causes server process to exit immediately, requires a token in header {token_header}\n\
         /headers  returns request headers as JSON\n\
         /health   returns health info\n\
         /ip       returns client IP (use X-Forwarded-For header if exists, then remote IP)\n\
         \n\
         Source commit: {SOURCE_COMMIT}\n\
         </pre></html>",
        max_age = cache.max_age_secs,
        delay = cache.delay_ms,
    )
}
