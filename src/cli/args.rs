//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// cachekey - deterministic CI build-cache keys
///
/// Derives cache keys from the target triple, job, toolchain version and a
/// fingerprint of native dependencies, and saves/restores artifacts under
/// those keys.
#[derive(Parser, Debug)]
#[command(name = "cachekey")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CACHEKEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .cachekey.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive a cache key and restore prefix
    Key(KeyArgs),

    /// Show the canonical dependency list and its hash
    Fingerprint(FingerprintArgs),

    /// Restore an artifact by exact key or restore prefix
    Restore(RestoreArgs),

    /// Save an artifact under a key
    Save(SaveArgs),

    /// List stored cache entries
    List(ListArgs),

    /// Remove old cache entries
    Prune(PruneArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where dependency identifiers come from
///
/// Explicit identifiers win over probing; with none given, `cargo tree` is
/// run for the target and filtered down to native crates.
#[derive(Args, Debug, Default, Clone)]
pub struct DependencySource {
    /// Dependency identifier (repeatable, e.g. ring-0.17.8)
    #[arg(short, long = "dep", value_name = "ID")]
    pub deps: Vec<String>,

    /// File with one dependency identifier per line
    #[arg(long, value_name = "FILE")]
    pub deps_file: Option<PathBuf>,

    /// Derive with an empty dependency set instead of probing
    #[arg(long, conflicts_with_all = ["deps", "deps_file"])]
    pub no_deps: bool,

    /// Cargo.toml of the project to probe
    #[arg(long, value_name = "PATH")]
    pub manifest_path: Option<PathBuf>,
}

/// Arguments for the key command
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Target triple
    #[arg(short, long, env = "CARGO_BUILD_TARGET")]
    pub target: Option<String>,

    /// CI job identifier
    #[arg(short, long, env = "GITHUB_JOB")]
    pub job: Option<String>,

    /// Toolchain version (probed from rustc when omitted)
    #[arg(long)]
    pub toolchain: Option<String>,

    #[command(flatten)]
    pub deps: DependencySource,

    /// Output format
    #[arg(short, long, default_value = "plain")]
    pub format: DataFormat,

    /// Append key and restore-key to a CI step-output file
    #[arg(long, value_name = "FILE")]
    pub github_output: Option<PathBuf>,
}

/// Arguments for the fingerprint command
#[derive(Parser, Debug)]
pub struct FingerprintArgs {
    /// Target triple (needed only when probing)
    #[arg(short, long, env = "CARGO_BUILD_TARGET")]
    pub target: Option<String>,

    #[command(flatten)]
    pub deps: DependencySource,

    /// Output format
    #[arg(short, long, default_value = "plain")]
    pub format: DataFormat,
}

/// Arguments for the restore command
#[derive(Parser, Debug)]
pub struct RestoreArgs {
    /// Exact key to look up
    #[arg(short, long)]
    pub key: String,

    /// Fallback prefix (repeatable, tried in order)
    #[arg(short, long = "restore-key", value_name = "PREFIX")]
    pub restore_keys: Vec<String>,

    /// Destination for the restored artifact
    #[arg(short, long)]
    pub path: PathBuf,

    /// Store directory (default: from config)
    #[arg(long, env = "CACHEKEY_STORE")]
    pub store: Option<PathBuf>,

    /// Exit with an error when nothing matches
    #[arg(long)]
    pub fail_on_miss: bool,

    /// Append cache-hit and cache-matched-key to a CI step-output file
    #[arg(long, value_name = "FILE")]
    pub github_output: Option<PathBuf>,
}

/// Arguments for the save command
#[derive(Parser, Debug)]
pub struct SaveArgs {
    /// Key to store under
    #[arg(short, long)]
    pub key: String,

    /// File or directory to store
    #[arg(short, long)]
    pub path: PathBuf,

    /// Store directory (default: from config)
    #[arg(long, env = "CACHEKEY_STORE")]
    pub store: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Store directory (default: from config)
    #[arg(long, env = "CACHEKEY_STORE")]
    pub store: Option<PathBuf>,
}

/// Arguments for the prune command
#[derive(Parser, Debug)]
pub struct PruneArgs {
    /// Remove entries older than N days (default: from config)
    #[arg(long)]
    pub days: Option<u32>,

    /// Dry run - show what would be removed
    #[arg(long)]
    pub dry_run: bool,

    /// Store directory (default: from config)
    #[arg(long, env = "CACHEKEY_STORE")]
    pub store: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Output format for derived data
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataFormat {
    /// The bare value
    Plain,
    /// name=value lines
    Env,
    /// JSON object
    Json,
}

/// Output format for list command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
