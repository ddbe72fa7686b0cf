//! Transfer engine
//!
//! Single-stream downloads and uploads with per-chunk progress and
//! cooperative cancellation. No multipart, no resume: a failed transfer
//! aborts whole, and whatever already reached the destination stays
//! there for the caller to deal with.

use std::path::Path;

use tokio::io::{AsyncRead, AsyncWrite, BufWriter};

use s3x_core::transfer::{CancelToken, ProgressFn, copy_chunked};
use s3x_core::{Error, Result};

use crate::client::{Session, sdk_message};

impl Session {
    /// Download `bucket`/`key` into `sink`.
    ///
    /// A metadata round trip fetches the declared size before the data
    /// stream starts, so progress snapshots carry a meaningful total;
    /// if it fails, nothing is written. The progress callback fires
    /// after every chunk. Cancellation is observed between chunks and
    /// leaves the sink exactly as far as the bytes already flushed;
    /// cleaning up a partial download is the caller's responsibility.
    ///
    /// Succeeds only once the declared byte count has been written; an
    /// early end of stream is a truncation error, not a short success.
    pub async fn download<W>(
        &self,
        bucket: &str,
        key: &str,
        sink: &mut W,
        on_progress: Option<ProgressFn<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let head = self
            .inner()
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::transfer(bucket, key, sdk_message(e)))?;
        let total_bytes = head.content_length().unwrap_or(0).max(0) as u64;

        let response = self
            .inner()
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::transfer(bucket, key, sdk_message(e)))?;

        let mut body = response.body.into_async_read();
        let written = copy_chunked(&mut body, sink, total_bytes, on_progress, cancel)
            .await
            .map_err(|e| Error::transfer(bucket, key, e.to_string()))?;

        if written < total_bytes {
            return Err(Error::transfer(
                bucket,
                key,
                format!("stream ended after {written} of {total_bytes} bytes"),
            ));
        }

        tracing::debug!(bucket, key, bytes = written, "download complete");
        Ok(())
    }

    /// Download `bucket`/`key` to a local file, creating parent
    /// directories as needed. An existing file is truncated.
    pub async fn download_to_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        on_progress: Option<ProgressFn<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    Error::transfer(bucket, key, format!("create {}: {e}", parent.display()))
                })?;
            }
        }

        let file = tokio::fs::File::create(path)
            .await
            .map_err(|e| Error::transfer(bucket, key, format!("create {}: {e}", path.display())))?;
        let mut sink = BufWriter::new(file);

        self.download(bucket, key, &mut sink, on_progress, cancel)
            .await
    }

    /// Upload `total_bytes` from `source` to `bucket`/`key` as one PUT.
    ///
    /// The source is drained through a counting chunk loop whose
    /// cumulative read count drives the progress callback, so progress
    /// reflects read-side throughput and can reach 100% before the
    /// remote store acknowledges the PUT. The body is staged in memory
    /// for the single-shot request; there is no multipart splitting.
    ///
    /// A mid-stream failure or cancellation aborts the whole call. Most
    /// providers will not have committed an incomplete single PUT, but
    /// that is provider-dependent.
    pub async fn upload<R>(
        &self,
        bucket: &str,
        key: &str,
        source: &mut R,
        total_bytes: u64,
        on_progress: Option<ProgressFn<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut body = Vec::with_capacity(total_bytes as usize);
        let read = copy_chunked(source, &mut body, total_bytes, on_progress, cancel)
            .await
            .map_err(|e| Error::transfer(bucket, key, e.to_string()))?;

        let mut request = self
            .inner()
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(aws_sdk_s3::primitives::ByteStream::from(body));

        if let Some(mime) = guess_content_type(key) {
            request = request.content_type(mime);
        }

        request
            .send()
            .await
            .map_err(|e| Error::transfer(bucket, key, sdk_message(e)))?;

        tracing::debug!(bucket, key, bytes = read, "upload complete");
        Ok(())
    }

    /// Upload a local file, deriving the byte count from its metadata.
    pub async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        on_progress: Option<ProgressFn<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<()> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::transfer(bucket, key, format!("{}: {e}", path.display())))?;
        let total_bytes = metadata.len();

        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| Error::transfer(bucket, key, format!("{}: {e}", path.display())))?;

        self.upload(bucket, key, &mut file, total_bytes, on_progress, cancel)
            .await
    }
}

/// Guess a content type from the key's extension
fn guess_content_type(key: &str) -> Option<String> {
    mime_guess::from_path(key)
        .first()
        .map(|m| m.essence_str().to_string())
}
