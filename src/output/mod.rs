mod archive;
mod json;

pub use archive::write_zip;
pub use json::write_json;

use crate::error::{Error, Result};
use crate::model::Outcome;
use std::path::Path;

/// Output format for pipeline results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON array of all outcomes
    Json,
    /// Zip archive with one JSON file per successful outcome
    Zip,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "zip" => Ok(OutputFormat::Zip),
            _ => Err(format!("Unknown format: {}. Use 'json' or 'zip'", s)),
        }
    }
}

/// Writes the outcomes in the requested format.
///
/// JSON goes to the path, or stdout when no path is given, and writes even
/// when every outcome failed. Zip requires a path and at least one success.
pub fn write_results(outcomes: &[Outcome], format: OutputFormat, path: Option<&Path>) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(outcomes, path),
        OutputFormat::Zip => {
            let path = path.ok_or_else(|| {
                Error::Configuration("--output is required for zip format".to_string())
            })?;
            write_zip(outcomes, path)
        }
    }
}
