//! Cache key derivation
//!
//! Key layout:
//!
//! ```text
//! v0-<job>-<target>-<toolchain>-<target>-<fingerprint>
//! \_______________/
//!   restore prefix
//! ```
//!
//! The restore prefix matches every key of the same job and target, so a
//! store can fall back to the newest entry when the exact fingerprint or
//! toolchain has never been cached. Bumping the version tag invalidates all
//! existing keys.

use crate::error::{CacheKeyError, CacheKeyResult};
use crate::key::fingerprint::{Fingerprint, HashAlgorithm};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Version tag used when none is configured
pub const DEFAULT_VERSION_TAG: &str = "v0";

/// Build-environment identifiers a key is derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKeyInput {
    /// Target triple (e.g., "x86_64-unknown-linux-gnu")
    pub platform_target: String,
    /// CI job identifier (e.g., "build")
    pub job_id: String,
    /// Compiler version (e.g., "1.82.0")
    pub toolchain_version: String,
    /// Dependency identifiers, unordered, duplicates allowed
    pub dependencies: Vec<String>,
}

impl CacheKeyInput {
    /// Create an input with no dependencies
    pub fn new(
        platform_target: impl Into<String>,
        job_id: impl Into<String>,
        toolchain_version: impl Into<String>,
    ) -> Self {
        Self {
            platform_target: platform_target.into(),
            job_id: job_id.into(),
            toolchain_version: toolchain_version.into(),
            dependencies: Vec::new(),
        }
    }

    /// Set the dependency identifiers
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

/// A derived key and its fallback prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKeyOutput {
    /// Exact-match key
    pub key: String,
    /// Prefix of `key` used for fallback lookups
    pub restore_prefix: String,
    /// Fingerprint that forms the last key component
    pub fingerprint: Fingerprint,
}

impl CacheKeyOutput {
    /// Fallback prefixes in lookup order
    pub fn restore_keys(&self) -> Vec<String> {
        vec![self.restore_prefix.clone()]
    }
}

/// Derives cache keys with a fixed version tag and hash algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDeriver {
    version_tag: String,
    algorithm: HashAlgorithm,
}

impl KeyDeriver {
    /// Create a deriver with an explicit version tag and algorithm
    pub fn new(version_tag: impl Into<String>, algorithm: HashAlgorithm) -> Self {
        Self {
            version_tag: version_tag.into(),
            algorithm,
        }
    }

    /// The configured version tag
    pub fn version_tag(&self) -> &str {
        &self.version_tag
    }

    /// The configured hash algorithm
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Derive the key and restore prefix for `input`
    pub fn derive(&self, input: &CacheKeyInput) -> CacheKeyResult<CacheKeyOutput> {
        require_non_empty("version_tag", &self.version_tag)?;
        require_non_empty("platform_target", &input.platform_target)?;
        require_non_empty("job_id", &input.job_id)?;
        require_non_empty("toolchain_version", &input.toolchain_version)?;

        let fingerprint = Fingerprint::compute(&input.dependencies, self.algorithm);

        let restore_prefix = format!(
            "{}-{}-{}-",
            self.version_tag, input.job_id, input.platform_target
        );
        let key = format!(
            "{}{}-{}-{}",
            restore_prefix, input.toolchain_version, input.platform_target, fingerprint.hash
        );

        debug!(
            "Derived key {} from {} dependencies",
            key,
            fingerprint.dependencies.len()
        );

        Ok(CacheKeyOutput {
            key,
            restore_prefix,
            fingerprint,
        })
    }
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_TAG, HashAlgorithm::default())
    }
}

/// Derive a key with the default version tag and SHA-1
pub fn derive_key(input: &CacheKeyInput) -> CacheKeyResult<CacheKeyOutput> {
    KeyDeriver::default().derive(input)
}

fn require_non_empty(field: &'static str, value: &str) -> CacheKeyResult<()> {
    if value.is_empty() {
        return Err(CacheKeyError::invalid_input(field, "must not be empty"));
    }
    Ok(())
}
