//! Append-only log of raw requests
//!
//! The log file is recreated at startup. Connection tasks send entries over
//! a channel to a single writer task, so appends never interleave.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Line written before every logged request.
pub const ENTRY_SEPARATOR: &[u8] = b"========================== REQUEST\n";

/// Pending entries before senders start waiting on the writer.
const CHANNEL_CAPACITY: usize = 1024;

/// Owner of the log file and its writer task.
pub struct RequestLog {
    handle: RequestLogHandle,
    writer: JoinHandle<()>,
}

/// Cloneable sender side given to connection tasks.
#[derive(Debug, Clone)]
pub struct RequestLogHandle {
    tx: mpsc::Sender<Bytes>,
}

impl RequestLog {
    /// Truncates or creates the log file and starts the writer task.
    pub async fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).await?;
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let writer = tokio::spawn(write_entries(file, rx, path));

        Ok(Self {
            handle: RequestLogHandle { tx },
            writer,
        })
    }

    pub fn handle(&self) -> RequestLogHandle {
        self.handle.clone()
    }

    /// Flushes queued entries and closes the file.
    ///
    /// Entries still held by outstanding handles are written before this
    /// returns, so drop every handle first.
    pub async fn close(self) {
        drop(self.handle);
        if let Err(e) = self.writer.await {
            tracing::warn!(error = %e, "Request log writer did not finish cleanly");
        }
    }
}

impl RequestLogHandle {
    /// Queues one request for the log. Failures are reported, never returned.
    pub async fn append(&self, raw: Bytes) {
        if self.tx.send(raw).await.is_err() {
            tracing::warn!("Request log is closed, entry dropped");
        }
    }
}

async fn write_entries(mut file: File, mut rx: mpsc::Receiver<Bytes>, path: PathBuf) {
    while let Some(raw) = rx.recv().await {
        let result = async {
            file.write_all(ENTRY_SEPARATOR).await?;
            file.write_all(&raw).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "Failed to append to request log");
        }
    }

    if let Err(e) = file.flush().await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to flush request log");
    }
    tracing::debug!(path = %path.display(), "Request log closed");
}
