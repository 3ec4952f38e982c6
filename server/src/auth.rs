//! Shared-secret gate for the privileged endpoints.
//!
//! `/exit` is always gated. In [`GateMode::Unified`] `/cpu` is gated as well.
//! The credential travels in a single request header (`X-Exit-Token` or
//! `X-Api-Token`, see [`GateMode::header_name`]). Header lookup is
//! case-insensitive, the value is compared verbatim.
//!
//! An empty configured secret never authorizes anything, so the gated
//! endpoints stay unusable until a secret is set.

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::{AuthConfig, GateMode};

/// Decide whether `presented` unlocks a privileged operation.
///
/// True iff both credentials are non-empty and byte-for-byte equal.
pub fn authorize(configured: impl AsRef<[u8]>, presented: impl AsRef<[u8]>) -> bool {
    let (configured, presented) = (configured.as_ref(), presented.as_ref());
    if configured.is_empty() || presented.is_empty() {
        return false;
    }
    constant_time_eq(configured, presented)
}

/// Constant-time byte comparison to prevent timing side-channel attacks.
///
/// Always iterates over the full length of `expected` regardless of `provided`
/// length, so an attacker cannot determine the key length from response times.
pub fn constant_time_eq(expected: &[u8], provided: &[u8]) -> bool {
    let mut diff = u8::from(expected.len() != provided.len());
    // Always iterate over the expected key length to avoid timing leak
    for (i, e) in expected.iter().enumerate() {
        let p = provided.get(i).copied().unwrap_or(0xff);
        diff |= e ^ p;
    }
    diff == 0
}

/// Configured secret plus the header it is read from.
#[derive(Debug, Clone)]
pub struct TokenGate {
    mode: GateMode,
    secret: String,
}

impl TokenGate {
    pub fn new(mode: GateMode, secret: impl Into<String>) -> Self {
        Self {
            mode,
            secret: secret.into(),
        }
    }

    pub fn from_config(auth: &AuthConfig) -> Self {
        Self::new(auth.mode, auth.token.clone())
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// Whether any request can ever pass this gate.
    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Check the credential header of a request.
    ///
    /// The raw header bytes are compared, so secrets outside ASCII work as
    /// long as the client sends the same bytes. A missing header is empty.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), Unauthorized> {
        let presented = headers
            .get(self.mode.header_name())
            .map(HeaderValue::as_bytes)
            .unwrap_or_default();

        if authorize(&self.secret, presented) {
            Ok(())
        } else {
            Err(Unauthorized { mode: self.mode })
        }
    }
}

/// Rejection returned by [`TokenGate::check`]; renders as a plain-text 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unauthorized {
    mode: GateMode,
}

impl Unauthorized {
    pub fn message(self) -> &'static str {
        match self.mode {
            GateMode::Exit => "Invalid exit token\n",
            GateMode::Unified => "Invalid API token\n",
        }
    }
}

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.message()).into_response()
    }
}
