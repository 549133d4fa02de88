//! Single HTTP GET streamed to a local file.
//!
//! The destination file is created lazily on the first body byte, so a non-2xx
//! response or an early transport failure leaves no file behind. The output
//! directory is created on demand; `create_dir_all` is idempotent, so racing
//! sibling tasks are fine.

use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::outcome::{DownloadError, SavedFile};
use crate::url_model;

/// Per-request curl settings for script downloads.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Connect timeout for each request.
    pub connect_timeout: Duration,
    /// Overall timeout for each request, including the body transfer.
    pub request_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(300),
        }
    }
}

fn open_dest(output_dir: &Path, dest: &Path) -> std::io::Result<File> {
    std::fs::create_dir_all(output_dir)?;
    // Truncate-if-exists: a rerun or a basename collision overwrites.
    File::create(dest)
}

/// Downloads `url` into `output_dir`, naming the file after the last URL path
/// segment. Returns the written file on success. Runs in the current thread;
/// the pool calls this from `spawn_blocking`.
pub(super) fn download_one(
    url: &str,
    output_dir: &Path,
    options: &FetchOptions,
) -> Result<SavedFile, DownloadError> {
    let filename = url_model::derive_filename(url);
    let dest: PathBuf = output_dir.join(&filename);

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.fail_on_error(true)?;
    easy.connect_timeout(options.connect_timeout)?;
    easy.timeout(options.request_timeout)?;

    let file: RefCell<Option<File>> = RefCell::new(None);
    let written = Cell::new(0u64);
    let io_error: RefCell<Option<std::io::Error>> = RefCell::new(None);

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            let mut slot = file.borrow_mut();
            if slot.is_none() {
                match open_dest(output_dir, &dest) {
                    Ok(f) => *slot = Some(f),
                    Err(e) => {
                        tracing::warn!("could not create {}: {}", dest.display(), e);
                        *io_error.borrow_mut() = Some(e);
                        return Ok(0); // abort transfer
                    }
                }
            }
            if let Some(f) = slot.as_mut() {
                if let Err(e) = f.write_all(data) {
                    tracing::warn!("write to {} failed: {}", dest.display(), e);
                    *io_error.borrow_mut() = Some(e);
                    return Ok(0);
                }
                written.set(written.get() + data.len() as u64);
            }
            Ok(data.len())
        })?;
        transfer.perform()
    };

    if let Err(e) = perform_result {
        if let Some(io) = io_error.into_inner() {
            return Err(DownloadError::Io(io));
        }
        if e.is_http_returned_error() {
            let code = easy.response_code()?;
            return Err(DownloadError::HttpStatus(code));
        }
        return Err(DownloadError::Network(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        // fail_on_error only covers >= 400; an unfollowed 3xx lands here.
        return Err(DownloadError::HttpStatus(code));
    }

    // Empty body: the write callback never fired, so create the file now.
    if file.borrow().is_none() {
        open_dest(output_dir, &dest)?;
    }

    Ok(SavedFile {
        path: dest,
        bytes_written: written.get(),
    })
}
