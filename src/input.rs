//! Input file helpers.

use crate::error::{Error, Result};
use std::path::Path;

/// Reads newline-delimited PURLs from a file, trimming whitespace and
/// skipping blank lines.
pub fn read_purls_from_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!("failed to read purls file {}: {e}", path.display()))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
