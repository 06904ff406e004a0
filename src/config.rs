//! Catalog configuration
//!
//! Settings are read once at startup: defaults, then an optional YAML file,
//! then environment overrides. The resulting value is passed explicitly to
//! whatever needs it; there is no process-wide configuration state.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding [`CatalogConfig::endpoint`]
pub const ENV_ENDPOINT: &str = "KOPIVERSE_ENDPOINT";
/// Environment variable overriding [`CatalogConfig::timeout_secs`]
pub const ENV_TIMEOUT_SECS: &str = "KOPIVERSE_TIMEOUT_SECS";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for this schema
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A setting has an unusable value
    #[error("Invalid setting {key}: {reason}")]
    Invalid {
        key: &'static str,
        reason: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// SPARQL query endpoint URL
    pub endpoint: String,
    /// Upper bound for one round-trip to the endpoint, in seconds
    pub timeout_secs: u64,
    /// Ontology namespace bound to the default (`:`) prefix
    pub namespace: String,
    /// Maximum number of "similar item" suggestions on a detail page
    pub recommendation_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3030/kopiverse/query".to_string(),
            timeout_secs: 10,
            namespace: "http://kopiverse.org/ontology#".to_string(),
            recommendation_limit: 3,
        }
    }
}

impl CatalogConfig {
    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading catalog config");
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Apply `KOPIVERSE_*` environment overrides
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "timeout_secs",
                reason: format!("not a whole number of seconds: {raw:?}"),
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check every setting is usable
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "endpoint",
                reason: format!("expected an http(s) URL, got {:?}", self.endpoint),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.recommendation_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "recommendation_limit",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(self.namespace.ends_with('#') || self.namespace.ends_with('/')) {
            return Err(ConfigError::Invalid {
                key: "namespace",
                reason: "must end with '#' or '/'".to_string(),
            });
        }
        oxiri::Iri::parse(self.namespace.as_str()).map_err(|e| ConfigError::Invalid {
            key: "namespace",
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Round-trip timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
