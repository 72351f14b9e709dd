//! Cache store collaborator
//!
//! The key deriver only names artifacts; a store persists and retrieves
//! them. [`CacheStore`] is the contract the CLI drives, [`LocalStore`] is a
//! filesystem implementation.
//!
//! # Lookup Order
//!
//! | Step | Match | Result |
//! |------|-------|--------|
//! | 1 | exact key | hit (`exact = true`) |
//! | 2 | newest key starting with a restore prefix, prefixes in order | partial hit |
//! | 3 | nothing | miss |
//!
//! Stored keys are immutable: saving an existing key leaves it untouched.

pub mod entry;
pub mod local;

pub use entry::{format_bytes, StoreEntry};
pub use local::{copy_artifact, LocalStore};

use crate::error::{CacheKeyError, CacheKeyResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Longest key a store accepts, in bytes. Keys are single path components,
/// so this is the common filesystem name limit.
pub const MAX_KEY_LEN: usize = 255;

/// Result of a restore lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// Whether any entry matched
    pub found: bool,
    /// Whether the match was on the exact key
    pub exact: bool,
    /// Key of the matched entry
    pub matched_key: Option<String>,
    /// Location of the stored artifact
    pub artifact_path: Option<PathBuf>,
}

impl RestoreOutcome {
    /// No entry matched
    pub fn miss() -> Self {
        Self {
            found: false,
            exact: false,
            matched_key: None,
            artifact_path: None,
        }
    }

    /// An entry matched
    pub fn hit(key: impl Into<String>, artifact_path: PathBuf, exact: bool) -> Self {
        Self {
            found: true,
            exact,
            matched_key: Some(key.into()),
            artifact_path: Some(artifact_path),
        }
    }
}

/// Result of a store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Artifact was persisted
    Stored(StoreEntry),
    /// Key was already present; nothing written
    AlreadyExists,
}

/// Cache store interface
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up `key`, falling back to the newest entry matching a prefix
    async fn restore(&self, key: &str, restore_prefixes: &[String])
        -> CacheKeyResult<RestoreOutcome>;

    /// Persist `artifact` under `key`
    async fn store(&self, key: &str, artifact: &Path) -> CacheKeyResult<StoreOutcome>;

    /// All complete entries, newest first
    async fn list(&self) -> CacheKeyResult<Vec<StoreEntry>>;

    /// Remove the entry for `key`; returns whether it existed
    async fn remove(&self, key: &str) -> CacheKeyResult<bool>;
}

/// Reject keys that cannot safely name a store entry
pub fn validate_key(key: &str) -> CacheKeyResult<()> {
    let reason = if key.is_empty() {
        Some("key is empty".to_string())
    } else if key.len() > MAX_KEY_LEN {
        Some(format!("key exceeds {} bytes", MAX_KEY_LEN))
    } else if key.contains(['/', '\\']) {
        Some("key contains a path separator".to_string())
    } else if key.starts_with('.') {
        Some("key starts with '.'".to_string())
    } else if key.chars().any(char::is_control) {
        Some("key contains control characters".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CacheKeyError::StoreKeyInvalid {
            key: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
