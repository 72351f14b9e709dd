//! Configuration schema for cachekey
//!
//! Configuration is stored at `~/.config/cachekey/config.toml`, optionally
//! overlaid by a project-local `.cachekey.toml`.

use crate::key::{HashAlgorithm, KeyDeriver, DEFAULT_VERSION_TAG};
use crate::probe::NativeFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Key derivation settings
    pub key: KeyConfig,

    /// External probe commands
    pub probe: ProbeConfig,

    /// Native dependency heuristics
    pub native: NativeFilter,

    /// Local cache store settings
    pub store: StoreConfig,
}

impl Config {
    /// Build a key deriver from the `[key]` section
    pub fn deriver(&self) -> KeyDeriver {
        KeyDeriver::new(self.key.version_tag.clone(), self.key.hash)
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Key derivation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Leading tag; bump to invalidate every key
    pub version_tag: String,

    /// Fingerprint hash algorithm
    pub hash: HashAlgorithm,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            version_tag: DEFAULT_VERSION_TAG.to_string(),
            hash: HashAlgorithm::default(),
        }
    }
}

/// Probe command settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Compiler executable queried for its version
    pub rustc: String,

    /// Cargo executable used to list the dependency tree
    pub cargo: String,

    /// Dependency kinds to include (`cargo tree -e`)
    pub edges: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            rustc: "rustc".to_string(),
            cargo: "cargo".to_string(),
            edges: "normal,build".to_string(),
        }
    }
}

/// Local store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store root (defaults to the state directory)
    pub dir: Option<PathBuf>,

    /// Auto-remove entries older than N days (0 = disabled)
    pub gc_days: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            gc_days: 30,
        }
    }
}
