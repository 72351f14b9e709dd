//! Save command - store an artifact under a key

use super::open_store;
use crate::cli::args::SaveArgs;
use crate::config::Config;
use crate::error::CacheKeyResult;
use crate::store::{format_bytes, CacheStore, StoreOutcome};
use crate::ui::{self, UiContext};

/// Execute the save command
pub async fn execute(args: SaveArgs, config: &Config) -> CacheKeyResult<()> {
    let ctx = UiContext::detect();
    let store = open_store(args.store, config);

    match store.store(&args.key, &args.path).await? {
        StoreOutcome::Stored(entry) => {
            ui::step_ok(
                &ctx,
                &format!("Saved {}", entry.key),
                Some(&format_bytes(entry.size_bytes)),
            );
        }
        StoreOutcome::AlreadyExists => {
            ui::step_warn(
                &ctx,
                &format!("Key already stored: {}", args.key),
                Some("keys are immutable, nothing written"),
            );
        }
    }

    Ok(())
}
