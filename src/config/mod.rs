//! Configuration management for cachekey

pub mod schema;

pub use schema::Config;

use crate::error::{CacheKeyError, CacheKeyResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".cachekey.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cachekey")
            .join("config.toml")
    }

    /// Get the state directory path
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cachekey")
    }

    /// Get the default local store path
    pub fn default_store_dir() -> PathBuf {
        Self::state_dir().join("store")
    }

    /// Walk up from `start` looking for a project-local config
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> CacheKeyResult<Config> {
        self.load_merged(None).await
    }

    /// Load the global config with an optional local config layered on top
    ///
    /// Tables merge key by key; arrays and scalars in the local file replace
    /// the global value.
    pub async fn load_merged(&self, local: Option<&Path>) -> CacheKeyResult<Config> {
        let mut merged = toml::Value::Table(toml::map::Map::new());

        if self.config_path.exists() {
            merged = deep_merge(merged, Self::read_value(&self.config_path).await?);
        } else {
            debug!("Config file not found, using defaults");
        }

        let source = match local {
            Some(path) => {
                debug!("Layering local config {}", path.display());
                merged = deep_merge(merged, Self::read_value(path).await?);
                path
            }
            None => self.config_path.as_path(),
        };

        Self::from_value(merged, source)
    }

    async fn read_value(path: &Path) -> CacheKeyResult<toml::Value> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CacheKeyError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str::<toml::Table>(&content)
            .map(toml::Value::Table)
            .map_err(|e| CacheKeyError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    fn from_value(value: toml::Value, path: &Path) -> CacheKeyResult<Config> {
        value.try_into().map_err(|e: toml::de::Error| CacheKeyError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> CacheKeyResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            CacheKeyError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> CacheKeyResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheKeyError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep merge two TOML values, `overlay` taking precedence
fn deep_merge(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_map), toml::Value::Table(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            toml::Value::Table(base_map)
        }
        (_, overlay) => overlay,
    }
}
