//! Error types for s3x-core
//!
//! One taxonomy covers the whole client: session construction, listing,
//! transfers, and single-call object operations. Every variant renders a
//! message suitable for direct display in a log pane, with the operation
//! target attached.

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for client operations
#[derive(Error, Debug)]
pub enum Error {
    /// Session construction failed (unresolvable region or endpoint).
    /// Fatal to that session only.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// A listing call failed; no partial results are kept
    #[error("Listing failed for {}: {message}", target(.bucket, .prefix))]
    Listing {
        bucket: String,
        prefix: String,
        message: String,
    },

    /// A download or upload failed, was truncated, or was cancelled
    #[error("Transfer failed for {}: {message}", target(.bucket, .key))]
    Transfer {
        bucket: String,
        key: String,
        message: String,
    },

    /// A single-call object operation failed; carries the provider's
    /// underlying message
    #[error("{operation} failed for {}: {message}", target(.bucket, .key))]
    Operation {
        operation: &'static str,
        bucket: String,
        key: String,
        message: String,
    },
}

/// Render "bucket/key", "bucket", or "account" for error context.
fn target(bucket: &str, key: &str) -> String {
    if bucket.is_empty() {
        "account".to_string()
    } else if key.is_empty() {
        bucket.to_string()
    } else {
        format!("{bucket}/{key}")
    }
}

impl Error {
    /// Build a listing error with call context attached
    pub fn listing(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Listing {
            bucket: bucket.into(),
            prefix: prefix.into(),
            message: message.into(),
        }
    }

    /// Build a transfer error with call context attached
    pub fn transfer(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Transfer {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Build an operation error with call context attached
    pub fn operation(
        operation: &'static str,
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Operation {
            operation,
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}
