//! List command - show stored cache entries

use super::{count_entries, open_store};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::CacheKeyResult;
use crate::store::{format_bytes, CacheStore, StoreEntry};

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> CacheKeyResult<()> {
    let store = open_store(args.store, config);
    let entries = store.list().await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Plain => print_plain(&entries),
        OutputFormat::Table if entries.is_empty() => println!("No cache entries found."),
        OutputFormat::Table => print_table(&entries),
    }

    Ok(())
}

fn print_table(entries: &[StoreEntry]) {
    let width = entries
        .iter()
        .map(|e| e.key.len())
        .max()
        .unwrap_or(0)
        .max("KEY".len());

    println!("{:<width$}  {:>10}  {:<16}", "KEY", "SIZE", "STORED");
    println!("{}", "-".repeat(width + 30));

    for entry in entries {
        println!(
            "{:<width$}  {:>10}  {:<16}",
            entry.key,
            format_bytes(entry.size_bytes),
            entry.stored_at.format("%Y-%m-%d %H:%M")
        );
    }

    println!();
    println!("Total: {}", count_entries(entries.len()));
}

fn print_plain(entries: &[StoreEntry]) {
    for entry in entries {
        println!("{}", entry.key);
    }
}
