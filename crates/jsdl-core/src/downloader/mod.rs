//! Bounded-concurrency download pool.
//!
//! One task is spawned per URL; each acquires a permit from a counting
//! semaphore before any network I/O, so at most `max_concurrent` transfers are
//! in flight at once. Every task emits exactly one [`DownloadOutcome`] on the
//! caller's channel, in completion order, whether it succeeded or failed. The
//! pool joins all tasks before returning. No retries, no cancellation.

mod fetch;
mod outcome;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

pub use fetch::FetchOptions;
pub use outcome::{DownloadError, DownloadOutcome, SavedFile};

/// One unit of work for the pool. Owned by the worker that executes it.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    /// Absolute URL to fetch.
    pub url: String,
    /// Directory the file is written into (created on demand).
    pub output_dir: PathBuf,
}

/// Aggregate result of a pool run. `succeeded + failed == total`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs all `tasks` with at most `max_concurrent` downloads in flight.
///
/// Each outcome is sent on `outcome_tx` as its task completes; the channel is
/// dropped when the last task finishes, ending the consumer's `recv` loop. A
/// failed download never affects its siblings. Returns after every task has
/// completed.
pub async fn run_downloads(
    tasks: Vec<DownloadTask>,
    max_concurrent: usize,
    options: FetchOptions,
    outcome_tx: mpsc::Sender<DownloadOutcome>,
) -> Result<RunSummary> {
    let total = tasks.len();
    let max_concurrent = max_concurrent.max(1);
    let semaphore = Arc::new(Semaphore::new(max_concurrent));
    let mut join_set = JoinSet::new();

    for task in tasks {
        let semaphore = Arc::clone(&semaphore);
        let tx = outcome_tx.clone();
        join_set.spawn(async move {
            // The pool never closes the semaphore; acquisition only fails when
            // the runtime is shutting down, in which case nothing runs anyway.
            let Ok(permit) = semaphore.acquire_owned().await else {
                return false;
            };

            let url = task.url.clone();
            let output_dir = task.output_dir.clone();
            let result = match tokio::task::spawn_blocking(move || {
                fetch::download_one(&url, &output_dir, &options)
            })
            .await
            {
                Ok(result) => result,
                Err(join_err) => Err(DownloadError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("download worker: {}", join_err),
                ))),
            };

            // Slot is freed before the outcome is observable, so a waiting
            // task can start even if the consumer is slow.
            drop(permit);

            let outcome = DownloadOutcome {
                url: task.url,
                result,
            };
            let success = outcome.is_success();
            // Receiver may already be gone (progress display shut down); the
            // download itself is unaffected.
            let _ = tx.send(outcome).await;
            success
        });
    }
    drop(outcome_tx);

    let mut summary = RunSummary {
        total,
        ..RunSummary::default()
    };
    while let Some(joined) = join_set.join_next().await {
        let success = joined.map_err(|e| anyhow::anyhow!("download task join: {}", e))?;
        if success {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
    }

    Ok(summary)
}
