//! Filesystem cache store
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<key>/entry.json
//! <root>/<key>/artifact/<name>
//! <root>/.partial-XXXXXX/      (one per in-progress save, never listed)
//! ```
//!
//! An entry only becomes visible once its staging directory is renamed into
//! place, so a crash mid-copy never produces a half-written hit. Concurrent
//! saves of one key race on that rename: the first wins, the rest report
//! [`StoreOutcome::AlreadyExists`].

use super::entry::StoreEntry;
use super::{validate_key, CacheStore, RestoreOutcome, StoreOutcome};
use crate::error::{CacheKeyError, CacheKeyResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs as stdfs;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const ENTRY_FILE: &str = "entry.json";
const ARTIFACT_DIR: &str = "artifact";
const PARTIAL_PREFIX: &str = ".partial-";

/// Cache store backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root` (created lazily on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_dir(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Read the metadata for `key`, if a complete entry exists
    pub async fn entry(&self, key: &str) -> CacheKeyResult<Option<StoreEntry>> {
        validate_key(key)?;
        self.read_entry(&self.entry_dir(key)).await
    }

    async fn read_entry(&self, dir: &Path) -> CacheKeyResult<Option<StoreEntry>> {
        let path = dir.join(ENTRY_FILE);
        let content = match fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheKeyError::io(
                    format!("reading {}", path.display()),
                    e,
                ))
            }
        };

        let entry: StoreEntry =
            serde_json::from_str(&content).map_err(|e| CacheKeyError::StoreEntryCorrupt {
                key: dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                reason: e.to_string(),
            })?;
        Ok(Some(entry))
    }

    fn artifact_path(&self, entry: &StoreEntry) -> PathBuf {
        self.entry_dir(&entry.key)
            .join(ARTIFACT_DIR)
            .join(&entry.artifact)
    }

    /// Persist `artifact` under `key` with an explicit timestamp
    pub async fn store_at(
        &self,
        key: &str,
        artifact: &Path,
        stored_at: DateTime<Utc>,
    ) -> CacheKeyResult<StoreOutcome> {
        validate_key(key)?;

        if !artifact.exists() {
            return Err(CacheKeyError::ArtifactNotFound(artifact.to_path_buf()));
        }

        if self.entry(key).await?.is_some() {
            info!("Cache entry {} already exists, not overwriting", key);
            return Ok(StoreOutcome::AlreadyExists);
        }

        let name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ARTIFACT_DIR.to_string());

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CacheKeyError::io(format!("creating store {}", self.root.display()), e))?;
        let staging = tempfile::Builder::new()
            .prefix(PARTIAL_PREFIX)
            .tempdir_in(&self.root)
            .map_err(|e| CacheKeyError::io(format!("staging in {}", self.root.display()), e))?;
        let partial = staging.path().to_path_buf();

        let size_bytes = copy_artifact(artifact, &partial.join(ARTIFACT_DIR).join(&name)).await?;

        let entry = StoreEntry {
            key: key.to_string(),
            stored_at,
            artifact: name,
            size_bytes,
        };
        let json = serde_json::to_string_pretty(&entry)?;
        let entry_path = partial.join(ENTRY_FILE);
        fs::write(&entry_path, json)
            .await
            .map_err(|e| CacheKeyError::io(format!("writing {}", entry_path.display()), e))?;

        if !self.publish(&partial, key).await? {
            info!("Cache entry {} was stored concurrently, discarding this copy", key);
            return Ok(StoreOutcome::AlreadyExists);
        }
        // Renamed away: nothing left for the guard to clean up
        let _ = staging.keep();

        info!("Stored {} ({} bytes)", key, size_bytes);
        Ok(StoreOutcome::Stored(entry))
    }

    /// Rename a staged entry into place. Returns false if a complete entry
    /// for `key` already occupies the slot.
    async fn publish(&self, staged: &Path, key: &str) -> CacheKeyResult<bool> {
        let final_dir = self.entry_dir(key);

        let err = match fs::rename(staged, &final_dir).await {
            Ok(()) => return Ok(true),
            Err(e) => e,
        };
        if self.read_entry(&final_dir).await?.is_some() {
            return Ok(false);
        }

        // Directory without metadata (interrupted older layout): replace it
        if final_dir.is_dir() {
            debug!("Replacing incomplete entry {}", final_dir.display());
            remove_path(&final_dir).await?;
            if let Err(e) = fs::rename(staged, &final_dir).await {
                if self.read_entry(&final_dir).await?.is_some() {
                    return Ok(false);
                }
                return Err(CacheKeyError::io(
                    format!("finalizing cache entry {}", final_dir.display()),
                    e,
                ));
            }
            return Ok(true);
        }

        Err(CacheKeyError::io(
            format!("finalizing cache entry {}", final_dir.display()),
            err,
        ))
    }

    /// Remove entries older than `days` days. Returns the affected entries.
    pub async fn prune(&self, days: u32, dry_run: bool) -> CacheKeyResult<Vec<StoreEntry>> {
        if days == 0 {
            return Ok(Vec::new());
        }

        let stale: Vec<StoreEntry> = self
            .list()
            .await?
            .into_iter()
            .filter(|e| e.is_older_than_days(days))
            .collect();

        if !dry_run {
            for entry in &stale {
                debug!("Pruning cache entry {}", entry.key);
                self.remove(&entry.key).await?;
            }
        }

        Ok(stale)
    }
}

#[async_trait]
impl CacheStore for LocalStore {
    async fn restore(
        &self,
        key: &str,
        restore_prefixes: &[String],
    ) -> CacheKeyResult<RestoreOutcome> {
        validate_key(key)?;

        if let Some(entry) = self.read_entry(&self.entry_dir(key)).await? {
            debug!("Exact cache hit for {}", key);
            return Ok(RestoreOutcome::hit(&entry.key, self.artifact_path(&entry), true));
        }

        let entries = self.list().await?;
        for prefix in restore_prefixes.iter().filter(|p| !p.is_empty()) {
            // Newest first: list() is already sorted
            if let Some(entry) = entries.iter().find(|e| e.key.starts_with(prefix.as_str())) {
                debug!("Prefix {} matched {}", prefix, entry.key);
                return Ok(RestoreOutcome::hit(&entry.key, self.artifact_path(entry), false));
            }
        }

        debug!("Cache miss for {}", key);
        Ok(RestoreOutcome::miss())
    }

    async fn store(&self, key: &str, artifact: &Path) -> CacheKeyResult<StoreOutcome> {
        self.store_at(key, artifact, Utc::now()).await
    }

    async fn list(&self) -> CacheKeyResult<Vec<StoreEntry>> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CacheKeyError::io(
                    format!("reading store {}", self.root.display()),
                    e,
                ))
            }
        };

        let mut entries = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| CacheKeyError::io(format!("reading store {}", self.root.display()), e))?
        {
            let name = item.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            match self.read_entry(&item.path()).await {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => debug!("Skipping incomplete entry {}", name),
                Err(e) => warn!("Skipping unreadable entry {}: {}", name, e),
            }
        }

        entries.sort_by(|a, b| {
            b.stored_at
                .cmp(&a.stored_at)
                .then_with(|| a.key.cmp(&b.key))
        });
        Ok(entries)
    }

    async fn remove(&self, key: &str) -> CacheKeyResult<bool> {
        validate_key(key)?;
        let dir = self.entry_dir(key);
        if !dir.exists() {
            return Ok(false);
        }
        remove_path(&dir).await?;
        Ok(true)
    }
}

/// Copy a file or directory tree to `dest`, returning bytes copied
///
/// Directories are merged into an existing `dest`; files overwrite it.
pub async fn copy_artifact(src: &Path, dest: &Path) -> CacheKeyResult<u64> {
    let src_owned = src.to_path_buf();
    let dest_owned = dest.to_path_buf();

    tokio::task::spawn_blocking(move || copy_recursive(&src_owned, &dest_owned))
        .await
        .map_err(|e| CacheKeyError::Internal(format!("copy task failed: {}", e)))?
        .map_err(|e| {
            CacheKeyError::io(
                format!("copying {} to {}", src.display(), dest.display()),
                e,
            )
        })
}

fn copy_recursive(src: &Path, dest: &Path) -> io::Result<u64> {
    let mut total = 0;

    for item in WalkDir::new(src).follow_root_links(true).follow_links(false) {
        let item = item?;

        // A symlinked root (e.g. `target -> /mnt/target`) is copied as its contents
        if item.depth() == 0 {
            if stdfs::metadata(src)?.is_dir() {
                stdfs::create_dir_all(dest)?;
            } else {
                if let Some(parent) = dest.parent() {
                    stdfs::create_dir_all(parent)?;
                }
                total += stdfs::copy(src, dest)?;
            }
            continue;
        }

        let relative = item
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dest.join(relative);
        let file_type = item.file_type();

        if file_type.is_dir() {
            stdfs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            let link = stdfs::read_link(item.path())?;
            if target.symlink_metadata().is_ok() {
                stdfs::remove_file(&target)?;
            }
            #[cfg(unix)]
            std::os::unix::fs::symlink(&link, &target)?;
            #[cfg(not(unix))]
            {
                let resolved = item.path().parent().unwrap_or(src).join(&link);
                total += stdfs::copy(resolved, &target)?;
            }
        } else {
            total += stdfs::copy(item.path(), &target)?;
        }
    }

    Ok(total)
}

async fn remove_path(path: &Path) -> CacheKeyResult<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    result.map_err(|e| CacheKeyError::io(format!("removing {}", path.display()), e))
}
