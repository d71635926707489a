//! Loading URL lists from disk

use log::debug;
use std::fs;
use std::path::Path;

use crate::core::UrlTarget;
use crate::core::error::Result;

/// Read one URL per line from `path`.
///
/// Lines are trimmed; blank lines and `#` comments are skipped. Order and
/// duplicates are kept.
pub fn load_urls_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<UrlTarget>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let targets = parse_url_list(&content);
    debug!("Loaded {} URLs from {}", targets.len(), path.display());
    Ok(targets)
}

/// Parse URL list text using the same rules as [`load_urls_from_file`].
pub fn parse_url_list(content: &str) -> Vec<UrlTarget> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(UrlTarget::new)
        .collect()
}
