//! Chunked transfer engine
//!
//! Moves bytes between a reader and a writer in fixed-size chunks,
//! reporting cumulative progress after every chunk and honoring a
//! cooperative cancellation flag between chunks. The s3 adapter wires
//! this to remote object streams; tests run it over in-memory buffers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::object::TransferProgress;

/// Transfer chunk size: 80 KiB
pub const CHUNK_SIZE: usize = 80 * 1024;

/// Progress callback, invoked synchronously after each chunk.
///
/// Called on the transfer's own task; callers that feed a UI should hand
/// the snapshot off asynchronously rather than doing display work here.
pub type ProgressFn<'a> = &'a mut (dyn FnMut(TransferProgress) + Send);

/// Cooperative cancellation flag shared between a caller and a running
/// transfer.
///
/// Cancellation is observed between chunks. Bytes already flushed to the
/// destination stay in place; cleaning up a partial file or object is
/// the caller's responsibility.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every transfer holding this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Why a chunked copy stopped before the stream was drained
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("read failed: {0}")]
    Read(std::io::Error),

    #[error("write failed: {0}")]
    Write(std::io::Error),

    #[error("transfer cancelled")]
    Cancelled,
}

/// Copy `reader` into `writer` in [`CHUNK_SIZE`] chunks until the reader
/// is drained, then flush the writer.
///
/// Returns the number of bytes written. `total_bytes` only feeds the
/// progress snapshots; callers decide what a short count means.
pub async fn copy_chunked<R, W>(
    reader: &mut R,
    writer: &mut W,
    total_bytes: u64,
    mut on_progress: Option<ProgressFn<'_>>,
    cancel: Option<&CancelToken>,
) -> std::result::Result<u64, CopyError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut transferred: u64 = 0;

    loop {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(CopyError::Cancelled);
            }
        }

        let n = reader.read(&mut buf).await.map_err(CopyError::Read)?;
        if n == 0 {
            break;
        }

        writer.write_all(&buf[..n]).await.map_err(CopyError::Write)?;
        transferred += n as u64;

        if let Some(callback) = on_progress.as_mut() {
            callback(TransferProgress {
                bytes_transferred: transferred,
                total_bytes,
            });
        }
    }

    writer.flush().await.map_err(CopyError::Write)?;
    Ok(transferred)
}
