//! Listing engine wiring
//!
//! Implements the core page-source seam over ListObjectsV2 and exposes
//! the materialized listing call on the session.

use async_trait::async_trait;

use s3x_core::listing::{self, ListingPage, PageSource, RawObject};
use s3x_core::{Error, Result, StorageEntry};

use crate::client::{Session, sdk_message};

#[async_trait]
impl PageSource for Session {
    async fn fetch_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<String>,
    ) -> Result<ListingPage> {
        let mut request = self
            .inner()
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .delimiter("/");

        if let Some(token) = token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::listing(bucket, prefix, sdk_message(e)))?;

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(str::to_string))
            .collect();

        let objects = response
            .contents()
            .iter()
            .map(|object| RawObject {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().unwrap_or(0),
                last_modified: object
                    .last_modified()
                    .and_then(|t| jiff::Timestamp::from_second(t.secs()).ok()),
                storage_class: object.storage_class().map(|sc| sc.as_str().to_string()),
                etag: object.e_tag().map(|e| e.trim_matches('"').to_string()),
            })
            .collect();

        // A truncated response without a token would loop forever; treat
        // it as the last page.
        let next_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ListingPage {
            common_prefixes,
            objects,
            next_token,
        })
    }
}

impl Session {
    /// List the entries one level below `prefix` in `bucket`.
    ///
    /// Consumes every continuation page before returning; see
    /// [`listing::list_entries`] for the normalization, deduplication,
    /// and ordering postconditions.
    pub async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<StorageEntry>> {
        listing::list_entries(self, bucket, prefix).await
    }
}
