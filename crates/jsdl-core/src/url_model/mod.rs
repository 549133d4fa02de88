//! URL modeling and filename derivation.
//!
//! Derives safe local filenames from the last URL path segment, sanitized for
//! Linux filesystems. Two script URLs sharing a basename map to the same local
//! file and the later download wins; that overwrite is accepted behavior.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

/// Default filename when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "download.js";

/// Derives a safe filename for saving a downloaded script.
///
/// Uses the last path segment of `url` (query string excluded), sanitized for
/// Linux (no `/`, NUL, or control chars; no leading/trailing dots or spaces).
///
/// # Examples
///
/// - `derive_filename("https://example.com/static/app.js")` → `"app.js"`
/// - `derive_filename("https://example.com/")` → `"download.js"`
pub fn derive_filename(url: &str) -> String {
    let raw = match filename_from_url_path(url) {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
