//! Configuration loading and defaults.
//!
//! Configuration is resolved in order of precedence (highest wins):
//!
//! 1. **Command line** — `--port` (applied by `main` via [`Config::with_port`])
//! 2. **Environment variables** — `PORT`, `EXIT_TOKEN`, `API_TOKEN`
//! 3. **Config file** — path via `--config <path>`, or `echoprobe.toml` in CWD
//! 4. **Compiled defaults** — see each field's default value below
//!
//! The TOML file mirrors the struct hierarchy:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 8000
//!
//! [auth]
//! mode = "exit"        # "exit" gates /exit, "unified" gates /exit and /cpu
//! token = ""           # empty disables the gated endpoints
//!
//! [cache]
//! max_age_secs = 10
//! delay_ms = 500
//!
//! [cpu]
//! iterations = 1000000
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Setting `API_TOKEN` in the environment switches `auth.mode` to `unified`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "echoprobe.toml";

/// Errors raised while resolving configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid port {value:?} in PORT: {source}")]
    Port {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub cpu: CpuConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (default `0.0.0.0`).
    #[serde(default = "default_bind")]
    pub bind: String,
    /// TCP port (default 8000). Override with `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Which endpoints the shared secret protects, and through which header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateMode {
    /// `X-Exit-Token` protects `/exit` only.
    #[default]
    Exit,
    /// `X-Api-Token` protects both `/exit` and `/cpu`.
    Unified,
}

impl GateMode {
    /// Request header carrying the credential in this mode.
    #[must_use]
    pub fn header_name(self) -> &'static str {
        match self {
            Self::Exit => "X-Exit-Token",
            Self::Unified => "X-Api-Token",
        }
    }

    #[must_use]
    pub fn gates_cpu(self) -> bool {
        matches!(self, Self::Unified)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Unified => "unified",
        }
    }
}

/// Shared-secret settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: GateMode,
    /// Secret compared against the presented header. Empty means the gated
    /// endpoints always answer 401.
    #[serde(default)]
    pub token: String,
}

/// `/cache` behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// `max-age` advertised in `Cache-Control` (default 10).
    #[serde(default = "default_cache_max_age")]
    pub max_age_secs: u32,
    /// Delay before the response is produced, in milliseconds (default 500).
    #[serde(default = "default_cache_delay_ms")]
    pub delay_ms: u64,
}

/// `/cpu` behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct CpuConfig {
    /// Number of SHA-256 computations per request (default 1 000 000).
    #[serde(default = "default_cpu_iterations")]
    pub iterations: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter level (default `info`). Overridden by `RUST_LOG` env var.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_cache_max_age() -> u32 {
    10
}
fn default_cache_delay_ms() -> u64 {
    500
}
fn default_cpu_iterations() -> u64 {
    1_000_000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_cache_max_age(),
            delay_ms: default_cache_delay_ms(),
        }
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            iterations: default_cpu_iterations(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration with the precedence chain: env vars > file > defaults.
    ///
    /// If `path` is `Some`, that file must exist. Otherwise `echoprobe.toml` in
    /// the current directory is used when present, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// `API_TOKEN` wins over `EXIT_TOKEN` when both are set. An empty
    /// `API_TOKEN` counts as unset and leaves the gate mode alone.
    pub fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup("PORT").filter(|v| !v.is_empty()) {
            self.server.port = value
                .parse()
                .map_err(|source| ConfigError::Port { value, source })?;
        }
        if let Some(token) = lookup("EXIT_TOKEN") {
            self.auth.token = token;
        }
        if let Some(token) = lookup("API_TOKEN").filter(|v| !v.is_empty()) {
            self.auth.token = token;
            self.auth.mode = GateMode::Unified;
        }
        Ok(self)
    }

    /// Whether `EXIT_TOKEN` is set but ignored because `API_TOKEN` took over.
    pub fn exit_token_shadowed(lookup: impl Fn(&str) -> Option<String>) -> bool {
        lookup("EXIT_TOKEN").is_some() && lookup("API_TOKEN").is_some_and(|v| !v.is_empty())
    }

    /// Override the port (from the command line).
    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    /// `bind:port` string handed to the listener.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.listen_addr(), "0.0.0.0:8000");
        assert_eq!(config.auth.mode, GateMode::Exit);
        assert!(config.auth.token.is_empty());
        assert_eq!(config.cache.max_age_secs, 10);
        assert_eq!(config.cache.delay_ms, 500);
        assert_eq!(config.cpu.iterations, 1_000_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [auth]
            mode = "unified"
            token = "s3cret"

            [cache]
            max_age_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.auth.mode, GateMode::Unified);
        assert_eq!(config.auth.token, "s3cret");
        assert_eq!(config.cache.max_age_secs, 60);
        assert_eq!(config.cache.delay_ms, 500);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_env_port_and_exit_token() {
        let config = Config::default()
            .apply_env(env(&[("PORT", "9090"), ("EXIT_TOKEN", "tok")]))
            .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.auth.token, "tok");
        assert_eq!(config.auth.mode, GateMode::Exit);
    }

    #[test]
    fn test_env_api_token_switches_mode() {
        let config = Config::default()
            .apply_env(env(&[("EXIT_TOKEN", "old"), ("API_TOKEN", "new")]))
            .unwrap();
        assert_eq!(config.auth.token, "new");
        assert_eq!(config.auth.mode, GateMode::Unified);
    }

    #[test]
    fn test_env_empty_api_token_is_unset() {
        let config = Config::default()
            .apply_env(env(&[("API_TOKEN", "")]))
            .unwrap();
        assert_eq!(config.auth.mode, GateMode::Exit);
        assert!(config.auth.token.is_empty());

        let config = Config::default()
            .apply_env(env(&[("EXIT_TOKEN", "tok"), ("API_TOKEN", "")]))
            .unwrap();
        assert_eq!(config.auth.mode, GateMode::Exit);
        assert_eq!(config.auth.token, "tok");
    }

    #[test]
    fn test_exit_token_shadowed() {
        assert!(Config::exit_token_shadowed(env(&[
            ("EXIT_TOKEN", "old"),
            ("API_TOKEN", "new")
        ])));
        assert!(!Config::exit_token_shadowed(env(&[("EXIT_TOKEN", "old")])));
        assert!(!Config::exit_token_shadowed(env(&[("API_TOKEN", "new")])));
        assert!(!Config::exit_token_shadowed(env(&[
            ("EXIT_TOKEN", "old"),
            ("API_TOKEN", "")
        ])));
    }

    #[test]
    fn test_env_empty_port_keeps_default() {
        let config = Config::default().apply_env(env(&[("PORT", "")])).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_env_invalid_port() {
        let err = Config::default()
            .apply_env(env(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Port { .. }));
    }

    #[test]
    fn test_cli_port_wins() {
        let config = Config::default()
            .apply_env(env(&[("PORT", "9090")]))
            .unwrap()
            .with_port(Some(7000));
        assert_eq!(config.server.port, 7000);
    }

    #[test]
    fn test_gate_mode_headers() {
        assert_eq!(GateMode::Exit.header_name(), "X-Exit-Token");
        assert_eq!(GateMode::Unified.header_name(), "X-Api-Token");
        assert!(!GateMode::Exit.gates_cpu());
        assert!(GateMode::Unified.gates_cpu());
    }
}
