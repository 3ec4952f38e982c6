//! Client address echo.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    response::Response,
};
use serde::Serialize;

use crate::routes::indented_json;

#[derive(Serialize)]
struct RemoteAddr<'a> {
    remote_addr: &'a str,
}

/// `GET /ip` — `{"remote_addr": "..."}`.
///
/// A non-empty `X-Forwarded-For` is reported verbatim (it is not validated).
/// Otherwise the transport peer is reported as `host:port`.
pub async fn ip(request: Request) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let remote_addr = resolve_remote_addr(request.headers(), peer);
    indented_json(&RemoteAddr {
        remote_addr: &remote_addr,
    })
}

pub(crate) fn resolve_remote_addr(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(xff), _) => xff.into_owned(),
        (None, Some(addr)) => addr.to_string(),
        (None, None) => String::new(),
    }
}
