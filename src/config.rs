//! Server configuration.

use crate::service::{DEFAULT_MAX_RETRIES, DuelService};
use crate::store::{MemoryStore, RoundStore, SqliteStore, StoreError};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Which round store backs the server.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    /// In-process store; state is lost on restart.
    #[default]
    Memory,
    /// SQLite file shared by every instance pointing at it.
    Sqlite,
}

/// Configuration for the duel server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Round store backend.
    #[serde(default)]
    store: StoreBackend,

    /// SQLite database path (sqlite backend only).
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Compare-and-swap attempts per operation.
    #[serde(default = "default_max_retries")]
    max_retries: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "number_duel.db".to_string()
}

fn default_max_retries() -> usize {
    DEFAULT_MAX_RETRIES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreBackend::default(),
            db_path: default_db_path(),
            max_retries: default_max_retries(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(store = %config.store, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, otherwise defaults, then applies
    /// environment overrides.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                info!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `NUMBER_DUEL_HOST`, `PORT`, `NUMBER_DUEL_STORE` and
    /// `NUMBER_DUEL_DB` from `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("NUMBER_DUEL_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::new(format!("PORT is not a valid port: {:?}", port)))?;
        }
        if let Some(store) = lookup("NUMBER_DUEL_STORE") {
            self.store = store
                .parse()
                .map_err(|_| ConfigError::new(format!("Unknown store backend: {:?}", store)))?;
        }
        if let Some(db_path) = lookup("NUMBER_DUEL_DB") {
            self.db_path = db_path;
        }
        debug!(config = ?self, "Environment overrides applied");
        Ok(self)
    }

    /// Opens the configured round store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the SQLite database cannot be opened.
    #[instrument(skip(self), fields(store = %self.store))]
    pub fn open_store(&self) -> Result<Arc<dyn RoundStore>, StoreError> {
        let store: Arc<dyn RoundStore> = match self.store {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Sqlite => Arc::new(SqliteStore::open(self.db_path.clone())?),
        };
        Ok(store)
    }

    /// Builds a service on the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be opened.
    pub fn build_service(&self) -> Result<DuelService, StoreError> {
        Ok(DuelService::new(self.open_store()?).with_max_retries(self.max_retries))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
