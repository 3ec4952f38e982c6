//! Remote process termination.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use crate::state::{AppState, ExitRequest};

/// `GET /exit` — ask the serve loop to end the process with status 0.
///
/// Always gated. The serve loop exits without draining in-flight requests,
/// so the `Exiting` body may never reach the caller.
pub async fn exit(State(state): State<AppState>, request: Request) -> Response {
    let requested_by = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_string(), |ci| ci.0.to_string());

    if let Err(rejection) = state.gate.check(request.headers()) {
        warn!("Rejected /exit from {requested_by}: invalid token");
        return rejection.into_response();
    }

    info!("Exit authorized for {requested_by}");
    if !state.exit.fire(ExitRequest { requested_by }) {
        error!("Exit requested but the serve loop is gone");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    (StatusCode::OK, "Exiting\n").into_response()
}
