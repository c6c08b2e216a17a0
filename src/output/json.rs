use crate::error::{Error, Result};
use crate::model::Outcome;
use std::path::Path;

pub fn write_json(outcomes: &[Outcome], path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(outcomes)?;
    match path {
        Some(path) => std::fs::write(path, json)
            .map_err(|e| Error::Serialization(format!("failed to write {}: {e}", path.display()))),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
