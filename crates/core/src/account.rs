//! Account configuration
//!
//! An account describes one S3-compatible endpoint plus the credentials
//! used against it. Persisting accounts belongs to the hosting
//! application; this crate only consumes the resolved values.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Connection parameters for one S3-compatible account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Human-facing label, not used for any remote call
    #[serde(default)]
    pub display_name: String,

    /// Endpoint URL or bare host; empty means the provider default
    pub service_url: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Region name
    #[serde(default = "default_region")]
    pub region: String,

    /// Use path-style bucket addressing (required by most self-hosted
    /// backends)
    #[serde(default = "default_true")]
    pub force_path_style: bool,

    /// Prefix a scheme-less service URL with https instead of http
    #[serde(default = "default_true")]
    pub use_ssl: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_true() -> bool {
    true
}

impl Account {
    /// Create an account with required fields and default flags
    pub fn new(
        service_url: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            display_name: String::new(),
            service_url: service_url.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: default_region(),
            force_path_style: true,
            use_ssl: true,
        }
    }

    /// Resolve the endpoint URL for this account.
    ///
    /// A configured value without a scheme gets `https://` or `http://`
    /// prefixed according to `use_ssl`. Returns `None` when no endpoint
    /// is configured, in which case the provider default applies.
    pub fn endpoint_url(&self) -> Result<Option<String>> {
        if self.service_url.trim().is_empty() {
            return Ok(None);
        }

        let url = if self.service_url.starts_with("http://")
            || self.service_url.starts_with("https://")
        {
            self.service_url.clone()
        } else {
            let scheme = if self.use_ssl { "https" } else { "http" };
            format!("{scheme}://{}", self.service_url)
        };

        url::Url::parse(&url)
            .map_err(|e| Error::Connection(format!("invalid endpoint '{url}': {e}")))?;

        Ok(Some(url))
    }
}
