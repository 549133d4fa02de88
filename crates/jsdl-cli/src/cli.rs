use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use jsdl_core::config;
use jsdl_core::downloader::{self, DownloadTask, FetchOptions};
use jsdl_core::{locate, page};

use crate::progress::ProgressRenderer;

/// Fetch a web page and download every script it references.
#[derive(Debug, Parser)]
#[command(name = "jsdl")]
#[command(about = "jsdl: download the script resources referenced by a page", long_about = None)]
pub struct Cli {
    /// Page URL to scan for <script src> references.
    pub url: String,

    /// Directory downloads are written to (default from config, "js_files").
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of downloads in flight at once.
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let output_dir = cli
            .output_dir
            .clone()
            .unwrap_or_else(|| cfg.output_dir.clone());
        let max_concurrent = cli
            .max_concurrent
            .unwrap_or(cfg.max_concurrent_downloads)
            .max(1);
        let options = FetchOptions {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            request_timeout: Duration::from_secs(
                cli.timeout_secs.unwrap_or(cfg.request_timeout_secs),
            ),
        };

        // Fatal path: no page, no run.
        let page_url = cli.url.clone();
        let fetched = tokio::task::spawn_blocking(move || page::fetch_page(&page_url))
            .await
            .map_err(|e| anyhow::anyhow!("page fetch join: {}", e))??;

        let sources = locate::script_sources_in(&fetched.body);
        tracing::info!("{}: {} script reference(s)", cli.url, sources.len());
        if sources.is_empty() {
            println!("No script resources referenced by {}", cli.url);
            return Ok(());
        }

        let tasks: Vec<DownloadTask> = sources
            .iter()
            .map(|src| DownloadTask {
                url: locate::resolve_source(&fetched.final_url, src),
                output_dir: output_dir.clone(),
            })
            .collect();

        let total = tasks.len();
        let (outcome_tx, mut outcome_rx) = tokio::sync::mpsc::channel::<downloader::DownloadOutcome>(16);
        let progress_handle = tokio::spawn(async move {
            let mut progress = ProgressRenderer::new(total);
            while let Some(outcome) = outcome_rx.recv().await {
                if let Err(err) = &outcome.result {
                    tracing::warn!("download failed: {}: {}", outcome.url, err);
                }
                progress.record(&outcome);
            }
            progress.finish()
        });

        let summary =
            downloader::run_downloads(tasks, max_concurrent, options, outcome_tx).await?;
        progress_handle
            .await
            .map_err(|e| anyhow::anyhow!("progress task join: {}", e))?;

        println!(
            "{} of {} script(s) downloaded to {} ({} failed)",
            summary.succeeded,
            summary.total,
            output_dir.display(),
            summary.failed
        );
        tracing::info!(
            "run finished: {} succeeded, {} failed",
            summary.succeeded,
            summary.failed
        );

        // Individual download failures do not change the exit code; only a
        // failed page fetch aborts the run.
        Ok(())
    }
}
