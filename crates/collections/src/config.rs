//! Client configuration, from TOML or the environment.
//!
//! ```toml
//! instance_url = "https://example.my.salesforce.com"
//! access_token = "00D..."
//! api_version = "v43.0"     # optional
//! max_batch_size = 200      # optional
//! timeout_secs = 30         # optional
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_API_VERSION: &str = "v43.0";

/// The collections resource accepts at most this many records per request.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 200;

pub const ENV_INSTANCE_URL: &str = "FORCE_INSTANCE_URL";
pub const ENV_ACCESS_TOKEN: &str = "FORCE_ACCESS_TOKEN";
pub const ENV_API_VERSION: &str = "FORCE_API_VERSION";
pub const ENV_MAX_BATCH_SIZE: &str = "FORCE_MAX_BATCH_SIZE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable {name} is not set")]
    MissingVar { name: &'static str },

    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidVar { name: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Instance root, e.g. `https://example.my.salesforce.com`.
    pub instance_url: String,
    /// Bearer token, obtained elsewhere.
    pub access_token: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_max_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}

impl ClientConfig {
    /// Config with default version, batch size and no timeout.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        ClientConfig {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            api_version: default_api_version(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            timeout_secs: None,
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Read `FORCE_INSTANCE_URL` and `FORCE_ACCESS_TOKEN` (required) plus
    /// `FORCE_API_VERSION` and `FORCE_MAX_BATCH_SIZE` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::MissingVar { name });

        let mut config =
            ClientConfig::new(required(ENV_INSTANCE_URL)?, required(ENV_ACCESS_TOKEN)?);
        if let Some(version) = lookup(ENV_API_VERSION) {
            config.api_version = version;
        }
        if let Some(value) = lookup(ENV_MAX_BATCH_SIZE) {
            config.max_batch_size = value.parse().map_err(|_| ConfigError::InvalidVar {
                name: ENV_MAX_BATCH_SIZE,
                value,
            })?;
        }
        Ok(config)
    }
}
