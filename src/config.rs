//! Runtime configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional YAML
//! file, then `SPECTRA__*` environment variables (`__` separates sections,
//! e.g. `SPECTRA__DISPATCH__MODE=sequential`). A `.env` file is loaded first if
//! present.

use crate::error::{Error, Result};
use crate::history::QueryLog;
use crate::orchestrator::{DispatchMode, Dispatcher, DEFAULT_MAX_IN_FLIGHT};
use crate::registry::SpecialistRegistry;
use config::{Config, Environment, File, FileFormat};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "SPECTRA";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Specialist scheduling
    pub dispatch: DispatchConfig,
    /// Query log settings
    pub history: HistoryConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Data sources for the built-in specialists
    pub data: DataConfig,
    /// Optional YAML file replacing the built-in specialist registry
    pub registry_file: Option<PathBuf>,
}

/// Specialist scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Sequential or concurrent dispatch
    pub mode: DispatchMode,
    /// Bound on concurrent specialist calls
    pub max_in_flight: usize,
    /// Per-specialist timeout; none means wait indefinitely
    pub specialist_timeout_ms: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Concurrent,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            specialist_timeout_ms: None,
        }
    }
}

/// Query log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum retained queries; unbounded when unset
    pub capacity: Option<usize>,
    /// Default number of entries returned by history listings
    pub listing_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            listing_limit: 10,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Data sources used by the built-in specialists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV file path or http(s) URL analyzed by the structured-data specialist
    pub csv_source: Option<String>,
    /// Publication list (CSV with `Title` and `Link`) searched by the literature specialist
    pub catalog_source: Option<String>,
    /// Directory where generated artifacts are written
    pub artifact_dir: Option<PathBuf>,
}

impl RouterConfig {
    /// Load configuration from defaults, an optional YAML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Load .env if present so local development picks up SPECTRA__* variables
        let _ = dotenv();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string (no environment layer)
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.dispatch.max_in_flight == 0 {
            return Err(Error::config("dispatch.max_in_flight must be at least 1"));
        }
        if self.dispatch.specialist_timeout_ms == Some(0) {
            return Err(Error::config("dispatch.specialist_timeout_ms must be positive"));
        }
        if self.history.capacity == Some(0) {
            return Err(Error::config("history.capacity must be at least 1"));
        }
        if self.history.listing_limit == 0 {
            return Err(Error::config("history.listing_limit must be at least 1"));
        }
        self.bind_addr()?;
        Ok(())
    }

    /// Parsed listen address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| Error::config(format!("invalid server.bind '{}': {}", self.server.bind, e)))
    }

    /// Dispatcher configured from the `dispatch` section
    pub fn dispatcher(&self) -> Dispatcher {
        let dispatcher = Dispatcher::new(self.dispatch.mode).with_max_in_flight(self.dispatch.max_in_flight);
        match self.dispatch.specialist_timeout_ms {
            Some(ms) => dispatcher.with_timeout(Duration::from_millis(ms)),
            None => dispatcher,
        }
    }

    /// Specialist registry from `registry_file`, or the built-in one
    pub fn registry(&self) -> Result<SpecialistRegistry> {
        match &self.registry_file {
            Some(path) => SpecialistRegistry::from_file(path),
            None => Ok(SpecialistRegistry::default()),
        }
    }

    /// Empty query log honoring `history.capacity`
    pub fn query_log(&self) -> QueryLog {
        match self.history.capacity {
            Some(capacity) => QueryLog::with_capacity(capacity),
            None => QueryLog::new(),
        }
    }
}
