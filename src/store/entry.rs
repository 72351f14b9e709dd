//! Store entry metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format bytes as human-readable size (e.g., "1.5 GB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Metadata persisted next to every stored artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    /// Exact cache key
    pub key: String,
    /// When the artifact was stored
    pub stored_at: DateTime<Utc>,
    /// File or directory name of the stored artifact
    pub artifact: String,
    /// Total size of regular files in the artifact
    pub size_bytes: u64,
}

impl StoreEntry {
    /// Whether the entry was stored more than `days` days ago
    pub fn is_older_than_days(&self, days: u32) -> bool {
        self.age_days() > i64::from(days)
    }

    /// Whole days since the entry was stored
    pub fn age_days(&self) -> i64 {
        (Utc::now() - self.stored_at).num_days()
    }
}
