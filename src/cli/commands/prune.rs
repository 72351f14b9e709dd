//! Prune command - remove old cache entries

use super::{count_entries, open_store};
use crate::cli::args::PruneArgs;
use crate::config::Config;
use crate::error::CacheKeyResult;
use crate::ui::{self, UiContext};

/// Execute the prune command
pub async fn execute(args: PruneArgs, config: &Config) -> CacheKeyResult<()> {
    let ctx = UiContext::detect();
    let days = args.days.unwrap_or(config.store.gc_days);

    if days == 0 {
        ui::step_info(&ctx, "Pruning is disabled (gc_days = 0)");
        return Ok(());
    }

    let store = open_store(args.store, config);
    let stale = store.prune(days, args.dry_run).await?;

    if stale.is_empty() {
        ui::step_ok(&ctx, &format!("No entries older than {} days", days), None);
        return Ok(());
    }

    ui::section(
        &ctx,
        &format!("{} older than {} days:", count_entries(stale.len()), days),
    );
    for entry in &stale {
        ui::remark(&ctx, &format!("{} ({} days old)", entry.key, entry.age_days()));
    }

    if args.dry_run {
        ui::step_info(&ctx, "Dry run - no entries removed");
    } else {
        ui::step_ok(&ctx, &format!("Removed {}", count_entries(stale.len())), None);
    }

    Ok(())
}
