#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! # echoprobe
//!
//! HTTP diagnostic and echo server for exercising load balancers, reverse
//! proxies, caches and deployment pipelines.
//!
//! ## API surface
//!
//! | Path       | Auth                  | Description                                  |
//! |------------|-----------------------|----------------------------------------------|
//! | `/`        | No                    | Route listing (HTML)                         |
//! | `/health`  | No                    | Liveness probe, body `ok`                    |
//! | `/headers` | No                    | Request headers as JSON                      |
//! | `/ip`      | No                    | Client address (`X-Forwarded-For` first)     |
//! | `/cache`   | No                    | Delayed response with `Cache-Control`        |
//! | `/cpu`     | Unified mode only     | Burns CPU with repeated SHA-256              |
//! | `/exit`    | Yes                   | Terminates the process with status 0         |
//!
//! Routes accept any method. The credential header is `X-Exit-Token` in the
//! default mode and `X-Api-Token` in unified mode.
//!
//! ## Architecture
//!
//! ```text
//! main.rs          — entry point, clap args, serve loop, exit handling
//! auth.rs          — authorize(), TokenGate, constant-time comparison
//! config.rs        — TOML + env-var configuration
//! state.rs         — AppState, exit channel
//! workload.rs      — Workload trait, SHA-256 burn
//! util.rs          — indented JSON, header-name casing
//! routes/
//!   mod.rs         — route table, 404 fallback
//!   root.rs        — /
//!   health.rs      — /health
//!   headers.rs     — /headers
//!   ip.rs          — /ip
//!   cache.rs       — /cache
//!   cpu.rs         — /cpu
//!   exit.rs        — /exit
//! ```

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use echoprobe::{router, AppState, Config, SOURCE_COMMIT};

/// HTTP diagnostic and echo server.
#[derive(Parser)]
#[command(name = "echoprobe", version)]
struct Cli {
    /// Path to TOML config file (default: `echoprobe.toml` if present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Port to listen on; overrides `PORT` and the config file.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Debug, Error)]
enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config.with_port(cli.port),
        Err(e) => {
            eprintln!("echoprobe: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    match run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_server(config: Config) -> Result<(), ServeError> {
    let addr = config.listen_addr();

    info!("echoprobe v{} starting", env!("CARGO_PKG_VERSION"));
    info!("Source commit: {SOURCE_COMMIT}");
    info!("Listening on {addr}");

    if Config::exit_token_shadowed(|key| std::env::var(key).ok()) {
        warn!("Both EXIT_TOKEN and API_TOKEN are set; EXIT_TOKEN is ignored");
    }

    let (state, mut exit_rx) = AppState::new(config);

    let mode = state.gate.mode();
    if state.gate.is_enabled() {
        info!("Token gate: {} mode, header {}", mode.as_str(), mode.header_name());
    } else {
        warn!(
            "No token configured, /exit{} will always answer 401",
            if mode.gates_cpu() { " and /cpu" } else { "" }
        );
    }

    let app = router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!("Server ready");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .into_future();

    tokio::select! {
        result = server => {
            result.map_err(ServeError::Serve)?;
            info!("Goodbye");
            Ok(())
        }
        Some(request) = exit_rx.recv() => {
            // Not a graceful shutdown: in-flight requests and the listener are abandoned
            warn!("Exiting due to /exit from {}", request.requested_by);
            std::process::exit(0);
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received SIGINT"),
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {e}");
                ctrl_c.await.ok();
                info!("Received SIGINT");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received SIGINT");
    }
}
