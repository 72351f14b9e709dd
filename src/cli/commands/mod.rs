//! CLI command implementations

pub mod completions;
pub mod config;
pub mod fingerprint;
pub mod key;
pub mod list;
pub mod prune;
pub mod restore;
pub mod save;

pub use completions::execute as completions;
pub use config::execute as config;
pub use fingerprint::execute as fingerprint;
pub use key::execute as key;
pub use list::execute as list;
pub use prune::execute as prune;
pub use restore::execute as restore;
pub use save::execute as save;

use crate::cli::args::DependencySource;
use crate::config::{Config, ConfigManager};
use crate::error::{CacheKeyError, CacheKeyResult};
use crate::probe::{enumerate_dependencies, read_dependency_list, CommandRunner, TreeQuery};
use crate::store::LocalStore;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Collect dependency identifiers from flags, a file, or `cargo tree`
pub(crate) async fn resolve_dependencies(
    source: &DependencySource,
    target: &str,
    config: &Config,
    runner: &dyn CommandRunner,
) -> CacheKeyResult<Vec<String>> {
    if source.no_deps {
        debug!("Dependency enumeration disabled (--no-deps)");
        return Ok(Vec::new());
    }

    if !source.deps.is_empty() || source.deps_file.is_some() {
        let mut deps = source.deps.clone();
        if let Some(ref path) = source.deps_file {
            let content = fs::read_to_string(path).await.map_err(|e| {
                CacheKeyError::invalid_input(
                    "dependencies",
                    format!("cannot read {}: {}", path.display(), e),
                )
            })?;
            deps.extend(read_dependency_list(&content));
        }
        debug!("Using {} explicit dependency identifiers", deps.len());
        return Ok(deps);
    }

    require_field("platform_target", target)?;
    let query = TreeQuery {
        cargo: config.probe.cargo.clone(),
        target: target.to_string(),
        edges: config.probe.edges.clone(),
        manifest_path: source.manifest_path.clone(),
    };
    info!("Enumerating native dependencies for {}", target);
    enumerate_dependencies(runner, &query, &config.native).await
}

/// Fail fast on an empty required field
pub(crate) fn require_field(field: &'static str, value: &str) -> CacheKeyResult<()> {
    if value.is_empty() {
        return Err(CacheKeyError::invalid_input(field, "must not be empty"));
    }
    Ok(())
}

/// Open the local store from a flag, config, or the default location
pub(crate) fn open_store(flag: Option<PathBuf>, config: &Config) -> LocalStore {
    let root = flag
        .or_else(|| config.store.dir.clone())
        .unwrap_or_else(ConfigManager::default_store_dir);
    debug!("Using store at {}", root.display());
    LocalStore::new(root)
}

/// "1 entry" / "N entries"
pub(crate) fn count_entries(n: usize) -> String {
    if n == 1 {
        "1 entry".to_string()
    } else {
        format!("{} entries", n)
    }
}

/// Append `name=value` lines to a CI step-output file
pub(crate) async fn append_outputs(path: &Path, outputs: &[(&str, &str)]) -> CacheKeyResult<()> {
    let mut content = String::new();
    for (name, value) in outputs {
        content.push_str(name);
        content.push('=');
        content.push_str(value);
        content.push('\n');
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| CacheKeyError::io(format!("opening {}", path.display()), e))?;
    file.write_all(content.as_bytes())
        .await
        .map_err(|e| CacheKeyError::io(format!("writing {}", path.display()), e))?;
    Ok(())
}
