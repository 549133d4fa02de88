//! Terminal rendering of download outcomes.
//!
//! A single consumer owns the display; workers never touch it directly, they
//! only send outcomes over the channel. Rendering is purely observational and
//! cannot affect a download's result.

use indicatif::{ProgressBar, ProgressStyle};
use jsdl_core::downloader::DownloadOutcome;

pub struct ProgressRenderer {
    bar: ProgressBar,
    succeeded: usize,
    failed: usize,
}

impl ProgressRenderer {
    /// Creates a `completed/total` bar for `total` expected outcomes.
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} downloads")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Records one outcome: prints a per-file line and advances the bar.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match &outcome.result {
            Ok(saved) => {
                self.succeeded += 1;
                self.bar.println(format!(
                    "downloaded {} -> {} ({} bytes)",
                    outcome.url,
                    saved.path.display(),
                    saved.bytes_written
                ));
            }
            Err(err) => {
                self.failed += 1;
                self.bar
                    .println(format!("failed {}: {}", outcome.url, err));
            }
        }
        self.bar.inc(1);
    }

    /// Finalizes the display and returns `(succeeded, failed)`.
    pub fn finish(self) -> (usize, usize) {
        self.bar.finish_and_clear();
        (self.succeeded, self.failed)
    }
}
