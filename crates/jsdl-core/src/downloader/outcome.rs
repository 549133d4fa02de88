//! Terminal result of one download attempt.

use std::path::PathBuf;
use thiserror::Error;

/// Why a single download failed. Per-task only; none of these abort the run.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Transport-level failure (DNS, connect, timeout, TLS, bad URL).
    #[error("network: {0}")]
    Network(#[from] curl::Error),
    /// Server responded with a non-2xx status. No file is written.
    #[error("HTTP {0}")]
    HttpStatus(u32),
    /// Local write failed (directory creation, file create, or body write).
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// A successfully written download.
#[derive(Debug, Clone)]
pub struct SavedFile {
    /// Where the body was written.
    pub path: PathBuf,
    /// Number of body bytes written.
    pub bytes_written: u64,
}

/// Exactly one of these is emitted per submitted URL, in completion order.
#[derive(Debug)]
pub struct DownloadOutcome {
    /// The URL the task attempted to fetch.
    pub url: String,
    pub result: Result<SavedFile, DownloadError>,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Bytes written on success, `None` on failure.
    pub fn bytes_written(&self) -> Option<u64> {
        self.result.as_ref().ok().map(|saved| saved.bytes_written)
    }
}
