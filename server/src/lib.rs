#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]

//! echoprobe library — the route table, handlers and configuration behind the
//! `echoprobe` binary, exposed so tests can drive the router in-process.
//!
//! - `auth` — shared-secret gate for `/exit` and `/cpu`
//! - `config` — TOML + env-var configuration
//! - `routes` — route table and handlers
//! - `state` — shared state and the exit channel
//! - `workload` — synthetic CPU work for `/cpu`
//! - `util` — JSON and header-name helpers

pub mod auth;
pub mod config;
pub mod routes;
pub mod state;
pub mod util;
pub mod workload;

pub use auth::{authorize, TokenGate};
pub use config::Config;
pub use routes::router;
pub use state::{AppState, ExitRequest};

/// Commit the binary was built from, taken from `SOURCE_COMMIT` at compile time.
pub const SOURCE_COMMIT: &str = match option_env!("SOURCE_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};
