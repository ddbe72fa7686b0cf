//! Value types returned to the presentation layer
//!
//! Everything here is an owned, immutable snapshot: callers keep whatever
//! a call returned and refresh by calling again. No UI framework types
//! cross this boundary.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One row of a listing result: a virtual directory or a leaf object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntry {
    /// Full key in the flat namespace, unique within one listing result
    pub key: String,

    /// Last path segment; prefixes keep a trailing separator. Never
    /// empty.
    pub display_name: String,

    /// Whether this entry is a virtual directory. Leaf metadata below is
    /// not meaningful when set.
    pub is_prefix: bool,

    /// Size in bytes (leaf objects only)
    pub size: i64,

    /// Last modified timestamp (leaf objects only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// Storage class (leaf objects only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// ETag without surrounding quotes (leaf objects only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl StorageEntry {
    /// Create an entry for a normalized common prefix
    pub fn prefix(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            is_prefix: true,
            size: 0,
            last_modified: None,
            storage_class: None,
            etag: None,
        }
    }

    /// Create an entry for a leaf object
    pub fn object(key: impl Into<String>, display_name: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            is_prefix: false,
            size,
            last_modified: None,
            storage_class: None,
            etag: None,
        }
    }

    /// Size for display; prefixes show "--"
    pub fn formatted_size(&self) -> String {
        if self.is_prefix {
            "--".to_string()
        } else {
            humansize::format_size(self.size.max(0) as u64, humansize::BINARY)
        }
    }

    /// Date for display; prefixes and unknown dates show "--"
    pub fn formatted_date(&self) -> String {
        match &self.last_modified {
            Some(ts) if !self.is_prefix => ts.strftime("%Y-%m-%d %H:%M:%S").to_string(),
            _ => "--".to_string(),
        }
    }
}

/// Per-chunk progress snapshot for a running transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferProgress {
    /// Cumulative bytes moved so far
    pub bytes_transferred: u64,

    /// Declared total; may be 0 while unknown
    pub total_bytes: u64,
}

impl TransferProgress {
    /// Completed fraction as a percentage; 0 while the total is unknown
    pub fn percent(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            (self.bytes_transferred as f64 / self.total_bytes as f64 * 100.0).min(100.0)
        }
    }
}

/// One object tag. Tag sets are order-insignificant remotely but kept as
/// an ordered sequence to preserve caller display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub key: String,
    pub value: String,
}

impl TagEntry {
    /// Create a tag entry
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
