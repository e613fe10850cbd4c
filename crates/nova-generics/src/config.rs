use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning knobs of the resolution engine.
///
/// ```toml
/// max_scan_depth = 5
/// path_hop_limit = 2
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct GenericsConfig {
    /// Recursion cap of [`crate::guess_class`]. Past it the guess is `java.lang.Object`.
    #[serde(default = "GenericsConfig::default_max_scan_depth")]
    pub max_scan_depth: usize,
    /// A path stops looking at superclasses and enclosing types once it holds this many nodes.
    #[serde(default = "GenericsConfig::default_path_hop_limit")]
    pub path_hop_limit: usize,
}

impl GenericsConfig {
    fn default_max_scan_depth() -> usize {
        5
    }

    fn default_path_hop_limit() -> usize {
        2
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(GenericsConfig)
    }
}

impl Default for GenericsConfig {
    fn default() -> Self {
        Self {
            max_scan_depth: Self::default_max_scan_depth(),
            path_hop_limit: Self::default_path_hop_limit(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` embeds a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_string())
    }
}
