//! Cache key derivation
//!
//! Derives deterministic, content-addressed cache keys from build-environment
//! identifiers. Pure computation: no I/O, no clock, no randomness.
//!
//! # Properties
//!
//! - Same input = byte-identical key on every machine
//! - Dependency order and duplicates do not affect the key
//! - The restore prefix is a strict prefix of the key

pub mod derive;
pub mod fingerprint;

pub use derive::{derive_key, CacheKeyInput, CacheKeyOutput, KeyDeriver, DEFAULT_VERSION_TAG};
pub use fingerprint::{Fingerprint, HashAlgorithm};
