//! Script resource discovery in a parsed HTML document.
//!
//! Walks the document tree in pre-order and collects the `src` attribute of
//! every `<script>` element, preserving document order and duplicates. Elements
//! with a missing or empty `src` contribute nothing; that is not an error.

use scraper::Html;

/// Collects script `src` values from `document` in document order.
///
/// Values are returned exactly as written in the markup (possibly relative);
/// use [`resolve_source`] to turn them into fetchable URLs.
pub fn script_sources(document: &Html) -> Vec<String> {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_element())
        .filter(|element| element.name() == "script")
        .filter_map(|element| element.attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `html` and collects script sources. The html5ever parser recovers
/// from malformed markup, so this cannot fail on bad input.
pub fn script_sources_in(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    script_sources(&document)
}

/// Resolves a script `src` against the page URL.
///
/// Relative and protocol-relative references are joined with the `url` crate.
/// If the join fails the raw value is returned unchanged, so the downloader
/// reports it as a per-task failure instead of dropping it silently.
pub fn resolve_source(page_url: &str, src: &str) -> String {
    match url::Url::parse(page_url).and_then(|base| base.join(src)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => src.to_string(),
    }
}
