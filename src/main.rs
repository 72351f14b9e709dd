//! cachekey - CI build-cache key deriver
//!
//! CLI entry point that dispatches to subcommands.

use cachekey::cli::{Cli, Commands};
use cachekey::config::{Config, ConfigManager};
use cachekey::error::{CacheKeyError, CacheKeyResult};
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CacheKeyResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions(args) = cli.command {
        cachekey::cli::commands::completions(args);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| CacheKeyError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    init_logging(cli.verbose, &config);
    if let Some(ref path) = local_config_path {
        debug!("Loaded local config: {}", path.display());
    }

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Key(args) => cachekey::cli::commands::key(args, &config).await,
        Commands::Fingerprint(args) => cachekey::cli::commands::fingerprint(args, &config).await,
        Commands::Restore(args) => cachekey::cli::commands::restore(args, &config).await,
        Commands::Save(args) => cachekey::cli::commands::save(args, &config).await,
        Commands::List(args) => cachekey::cli::commands::list(args, &config).await,
        Commands::Prune(args) => cachekey::cli::commands::prune(args, &config).await,
        Commands::Config(args) => {
            cachekey::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// Logging goes to stderr so stdout carries only command output.
/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("cachekey=warn"),
        1 => EnvFilter::new("cachekey=info"),
        _ => EnvFilter::new("cachekey=debug"),
    };

    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }
}
