//! CPU load generator.

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::state::AppState;
use crate::workload::burn;

/// `GET /cpu` — run `cpu.iterations` units of work inline, then answer 200
/// with an empty body.
///
/// In unified gate mode the request must carry a valid `X-Api-Token`; a
/// rejected request does no work.
pub async fn cpu(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if state.gate.mode().gates_cpu() {
        if let Err(rejection) = state.gate.check(&headers) {
            warn!("Rejected /cpu: invalid API token");
            return rejection.into_response();
        }
    }

    let iterations = state.config.cpu.iterations;
    let started = Instant::now();
    burn(state.workload.as_ref(), iterations);
    debug!(iterations, elapsed = ?started.elapsed(), "CPU load done");

    StatusCode::OK.into_response()
}
