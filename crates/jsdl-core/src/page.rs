//! Target page fetch.
//!
//! Uses the curl crate (libcurl) to GET the page whose script references will
//! be downloaded. Any failure here is fatal for the run: with no document
//! there is nothing to download.

use anyhow::{Context, Result};
use std::time::Duration;

/// A fetched page body plus the URL it was actually served from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Effective URL after redirects; script references resolve against this.
    pub final_url: String,
    /// Response body, decoded lossily as UTF-8.
    pub body: String,
}

/// Performs a GET for the target page and returns its body.
///
/// Follows redirects. Non-2xx responses and transport errors are returned as
/// errors. Runs in the current thread; call from `spawn_blocking` if used from
/// async code.
pub fn fetch_page(url: &str) -> Result<FetchedPage> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.fail_on_error(true)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(60))?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer
            .perform()
            .with_context(|| format!("GET {} failed", url))?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    let final_url = easy
        .effective_url()
        .ok()
        .flatten()
        .unwrap_or(url)
        .to_string();

    Ok(FetchedPage {
        final_url,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
