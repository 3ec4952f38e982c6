//! Unauthenticated health-check endpoint.

/// `GET /health` — liveness probe. Always `ok`, suitable for load-balancer
/// health checks.
pub async fn health() -> &'static str {
    "ok"
}
