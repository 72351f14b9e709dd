//! cachekey - deterministic CI build-cache keys
//!
//! Derives cache keys from the target triple, CI job, toolchain version
//! and a fingerprint of native dependencies, and saves/restores build
//! artifacts under those keys.

pub mod cli;
pub mod config;
pub mod error;
pub mod key;
pub mod probe;
pub mod store;
pub mod ui;

pub use error::{CacheKeyError, CacheKeyResult};
