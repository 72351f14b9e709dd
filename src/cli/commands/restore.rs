//! Restore command - fetch an artifact by key or restore prefix

use super::{append_outputs, open_store};
use crate::cli::args::RestoreArgs;
use crate::config::Config;
use crate::error::{CacheKeyError, CacheKeyResult};
use crate::store::{copy_artifact, format_bytes, CacheStore};
use crate::ui::{self, UiContext};

/// Execute the restore command
pub async fn execute(args: RestoreArgs, config: &Config) -> CacheKeyResult<()> {
    let ctx = UiContext::detect();
    let store = open_store(args.store.clone(), config);

    let outcome = store.restore(&args.key, &args.restore_keys).await?;

    let (Some(matched), Some(artifact)) = (outcome.matched_key, outcome.artifact_path) else {
        ui::step_warn(&ctx, &format!("Cache miss for {}", args.key), None);
        if let Some(ref path) = args.github_output {
            append_outputs(path, &[("cache-hit", "false")]).await?;
        }
        if args.fail_on_miss {
            return Err(CacheKeyError::User(format!("No cache entry matched {}", args.key)));
        }
        return Ok(());
    };

    let bytes = copy_artifact(&artifact, &args.path).await?;

    if outcome.exact {
        ui::step_ok(&ctx, "Restored exact match", Some(&matched));
    } else {
        ui::step_warn(
            &ctx,
            &format!("Restored partial match {}", matched),
            Some("exact key will be saved after the build"),
        );
    }
    ui::key_value(&ctx, "path", &args.path.display().to_string());
    ui::key_value(&ctx, "size", &format_bytes(bytes));

    if let Some(ref path) = args.github_output {
        let hit = if outcome.exact { "true" } else { "false" };
        append_outputs(path, &[("cache-hit", hit), ("cache-matched-key", matched.as_str())]).await?;
    }

    Ok(())
}
