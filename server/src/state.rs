//! Shared application state passed to every handler via Axum's `State` extractor.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::auth::TokenGate;
use crate::config::Config;
use crate::workload::{Sha256Workload, Workload};

/// Shared, read-only state for the echoprobe server.
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup.
    pub config: Arc<Config>,
    /// Credential check for `/exit` (and `/cpu` in unified mode).
    pub gate: TokenGate,
    /// Unit of work repeated by `/cpu`.
    pub workload: Arc<dyn Workload + Send + Sync>,
    /// Hands authorized `/exit` requests to the serve loop.
    pub exit: ExitTrigger,
}

impl AppState {
    /// Build state from a config. The returned receiver yields one
    /// [`ExitRequest`] per authorized `/exit`.
    pub fn new(config: Config) -> (Self, mpsc::UnboundedReceiver<ExitRequest>) {
        let (exit, exit_rx) = ExitTrigger::channel();
        let state = Self {
            gate: TokenGate::from_config(&config.auth),
            config: Arc::new(config),
            workload: Arc::new(Sha256Workload::default()),
            exit,
        };
        (state, exit_rx)
    }

    /// Replace the `/cpu` work unit.
    #[must_use]
    pub fn with_workload(mut self, workload: Arc<dyn Workload + Send + Sync>) -> Self {
        self.workload = workload;
        self
    }
}

/// Request to terminate the process, raised by an authorized `/exit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitRequest {
    /// Peer that asked for the exit, for the log line.
    pub requested_by: String,
}

/// Sending half of the exit channel. The serve loop in `main` owns the
/// receiver and performs the actual process exit.
#[derive(Debug, Clone)]
pub struct ExitTrigger {
    tx: mpsc::UnboundedSender<ExitRequest>,
}

impl ExitTrigger {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ExitRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns false when nothing is listening any more.
    pub fn fire(&self, request: ExitRequest) -> bool {
        self.tx.send(request).is_ok()
    }
}
