//! Server configuration.
//!
//! Defaults, then an optional JSON file, then environment overrides.
//! The file may name any subset of fields; the rest keep their defaults.

use core::fmt;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::adapters::gatt::DEFAULT_MAX_ATTRIBUTE_LEN;
use crate::protocol::chunked::DEFAULT_CHUNK_SIZE;

/// Env var naming a JSON config file.
pub const ENV_CONFIG: &str = "GATTFS_CONFIG";
/// Env var overriding [`ServerConfig::root_dir`].
pub const ENV_ROOT: &str = "GATTFS_ROOT";
/// Env var overriding [`ServerConfig::chunk_size`].
pub const ENV_CHUNK_SIZE: &str = "GATTFS_CHUNK_SIZE";

/// Room a CHUNK line needs besides its data: prefix, a short filename,
/// the range and the status tag.
const CHUNK_LINE_OVERHEAD: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    // --- Storage ---
    /// Working directory every file name is resolved against
    pub root_dir: PathBuf,

    // --- Protocol ---
    /// Encoded units per download chunk
    pub chunk_size: usize,

    // --- GATT ---
    /// Advertised device name
    pub device_name: String,
    /// Primary service UUID
    pub service_uuid: String,
    /// Read/write characteristic UUID
    pub characteristic_uuid: String,
    /// ATT maximum attribute value length
    pub max_attribute_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            chunk_size: DEFAULT_CHUNK_SIZE,
            device_name: "gattfs".into(),
            service_uuid: "12345678-1234-5678-1234-56789abcdef0".into(),
            characteristic_uuid: "12345678-1234-5678-1234-56789abcdef1".into(),
            max_attribute_len: DEFAULT_MAX_ATTRIBUTE_LEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file could not be read.
    Read { path: PathBuf, detail: String },
    /// Config file is not valid JSON for [`ServerConfig`].
    Parse { path: PathBuf, detail: String },
    /// An environment override is not a valid value.
    BadOverride { var: &'static str, value: String },
    /// Loaded values are unusable.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, detail } => {
                write!(f, "cannot read config {}: {}", path.display(), detail)
            }
            Self::Parse { path, detail } => {
                write!(f, "invalid config {}: {}", path.display(), detail)
            }
            Self::BadOverride { var, value } => write!(f, "invalid {}={:?}", var, value),
            Self::Invalid(what) => write!(f, "invalid config: {}", what),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_owned(),
            detail: e.to_string(),
        })?;
        Self::from_json(&text).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            detail: e.to_string(),
        })
    }

    /// Full load: defaults, then `path` (or `$GATTFS_CONFIG`), then env
    /// overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(ENV_CONFIG).map(PathBuf::from);
        let mut config = match path.or(env_path.as_deref()) {
            Some(p) => {
                info!("config: loading {}", p.display());
                Self::from_file(p)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GATTFS_ROOT` / `GATTFS_CHUNK_SIZE` as resolved by `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(root) = lookup(ENV_ROOT) {
            self.root_dir = PathBuf::from(root);
        }
        if let Some(raw) = lookup(ENV_CHUNK_SIZE) {
            self.chunk_size = raw.trim().parse().map_err(|_| ConfigError::BadOverride {
                var: ENV_CHUNK_SIZE,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    /// Reject unusable values; warn about risky ones.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1"));
        }
        if self.max_attribute_len == 0 {
            return Err(ConfigError::Invalid("max_attribute_len must be at least 1"));
        }
        if self.chunk_size + CHUNK_LINE_OVERHEAD > self.max_attribute_len {
            warn!(
                "config: chunk_size {} may overflow the {}-byte attribute value",
                self.chunk_size, self.max_attribute_len
            );
        }
        Ok(())
    }
}
