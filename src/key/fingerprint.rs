//! Dependency fingerprinting
//!
//! Reduces an unordered, possibly duplicated set of dependency identifiers
//! to a canonical text and hashes it. Same dependency set = same fingerprint.

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Hash algorithm used for the fingerprint component of a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-1 (40 hex chars)
    #[default]
    Sha1,
    /// SHA-256 (64 hex chars)
    Sha256,
}

impl HashAlgorithm {
    /// Hash `data` and render the digest as lowercase hex
    pub fn hex_digest(&self, data: &[u8]) -> String {
        match self {
            Self::Sha1 => hex::encode(Sha1::digest(data)),
            Self::Sha256 => hex::encode(Sha256::digest(data)),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            other => Err(format!("unknown hash algorithm '{other}' (expected sha1 or sha256)")),
        }
    }
}

/// Canonical form of a dependency set plus its hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Sorted, deduplicated identifiers
    pub dependencies: Vec<String>,
    /// Algorithm that produced `hash`
    pub algorithm: HashAlgorithm,
    /// Alphanumeric-only rendering of the digest
    pub hash: String,
}

impl Fingerprint {
    /// Fingerprint a dependency set
    pub fn compute<I, S>(dependencies: I, algorithm: HashAlgorithm) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dependencies = canonicalize(dependencies);
        let text = canonical_text(&dependencies);
        let hash = strip_non_alphanumeric(&algorithm.hex_digest(text.as_bytes()));

        Self {
            dependencies,
            algorithm,
            hash,
        }
    }

    /// The exact text that was hashed
    pub fn text(&self) -> String {
        canonical_text(&self.dependencies)
    }
}

/// Deduplicate and sort identifiers in byte order. Empty identifiers are dropped.
pub fn canonicalize<I, S>(dependencies: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    dependencies
        .into_iter()
        .filter(|d| !d.as_ref().is_empty())
        .map(|d| d.as_ref().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Join canonical identifiers with `\n`, no trailing newline
pub fn canonical_text(canonical: &[String]) -> String {
    canonical.join("\n")
}

/// Keep only ASCII letters and digits
pub fn strip_non_alphanumeric(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
