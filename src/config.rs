//! Configuration for the command-line front end.
//!
//! Values come from built-in defaults, then an optional JSON file, then
//! command-line flags (later sources win).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rsa::{DEFAULT_E, DEFAULT_P, DEFAULT_Q};

pub const DEFAULT_KEY_STORE_PATH: &str = "rsa_chat_keys.json";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Key parameters offered when `keygen` is run without flags.
/// Kept as decimal strings so they can exceed 64 bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDefaults {
    pub p: String,
    pub q: String,
    pub e: String,
}

impl Default for KeyDefaults {
    fn default() -> Self {
        Self {
            p: DEFAULT_P.to_string(),
            q: DEFAULT_Q.to_string(),
            e: DEFAULT_E.to_string(),
        }
    }
}

/// JSON config file format.
///
/// Example `rsa_chat.json`:
/// ```json
/// {
///   "key_store_path": "/home/alice/.rsa_chat/keys.json",
///   "log_filter": "rsa_chat=debug",
///   "defaults": { "p": "1009", "q": "1013", "e": "65537" }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub key_store_path: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub defaults: Option<KeyDefaults>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub key_store_path: PathBuf,
    pub log_filter: String,
    pub defaults: KeyDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_store_path: PathBuf::from(DEFAULT_KEY_STORE_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            defaults: KeyDefaults::default(),
        }
    }
}

impl Config {
    /// Load config from a JSON file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(text)?;
        Ok(Self::default().merge_file(file))
    }

    fn merge_file(mut self, file: ConfigFile) -> Self {
        if let Some(path) = file.key_store_path {
            self.key_store_path = path;
        }
        if let Some(filter) = file.log_filter {
            self.log_filter = filter;
        }
        if let Some(defaults) = file.defaults {
            self.defaults = defaults;
        }
        self
    }

    /// Apply command-line overrides on top of this config.
    pub fn with_overrides(mut self, key_store_path: Option<PathBuf>, log_filter: Option<String>) -> Self {
        if let Some(path) = key_store_path {
            self.key_store_path = path;
        }
        if let Some(filter) = log_filter {
            self.log_filter = filter;
        }
        self
    }
}
