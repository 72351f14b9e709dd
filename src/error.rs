//! Error types for cachekey
//!
//! All modules use `CacheKeyResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cachekey operations
pub type CacheKeyResult<T> = Result<T, CacheKeyError>;

/// All errors that can occur in cachekey
#[derive(Error, Debug)]
pub enum CacheKeyError {
    // Derivation errors
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Store errors
    #[error("Invalid cache key for store: {key}: {reason}")]
    StoreKeyInvalid { key: String, reason: String },

    #[error("Corrupt store entry {key}: {reason}")]
    StoreEntryCorrupt { key: String, reason: String },

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(PathBuf),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl CacheKeyError {
    /// Create an invalid input error for a named field
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInput {
                field: "platform_target",
                ..
            } => Some("Pass --target or set CARGO_BUILD_TARGET"),
            Self::InvalidInput { field: "job_id", .. } => {
                Some("Pass --job or set GITHUB_JOB")
            }
            Self::InvalidInput {
                field: "toolchain_version",
                ..
            } => Some("Pass --toolchain or make sure rustc is on PATH"),
            Self::InvalidInput {
                field: "dependencies",
                ..
            } => Some("Pass --dep/--deps-file, or --no-deps to skip enumeration"),
            Self::ConfigInvalid { .. } => {
                Some("Fix the TOML file, or pass --no-local to skip the project config")
            }
            _ => None,
        }
    }
}
