//! # Configuration
//!
//! `cobuy.toml` layout; every section and key is optional.
//!
//! ```toml
//! [data]
//! reviews = "data/Electronics.json"
//! metadata = "data/meta_Electronics.json"
//!
//! [ingest]
//! max_review_lines = 2000000
//! max_metadata_lines = 500000
//!
//! [build]
//! max_products_per_user = 500
//! fan_out_policy = "truncate"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//! cors_origins = ["http://localhost:3000"]
//! ```

use cobuy_core::{BuildOptions, CobuyError, IngestLimits};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the raw sources live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub reviews: PathBuf,
    pub metadata: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            reviews: PathBuf::from("data/Electronics.json"),
            metadata: PathBuf::from("data/meta_Electronics.json"),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `None` means localhost only.
    pub cors_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: None,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data: DataConfig,
    pub ingest: IngestLimits,
    pub build: BuildOptions,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Parse a configuration document.
    pub fn from_toml(text: &str) -> Result<Self, CobuyError> {
        toml::from_str(text).map_err(|e| CobuyError::ConfigError(e.to_string()))
    }

    /// Load the configuration file, or defaults when no path is given.
    ///
    /// # Errors
    /// `CobuyError::ConfigError` if an explicit path cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, CobuyError> {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|e| {
            CobuyError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}
