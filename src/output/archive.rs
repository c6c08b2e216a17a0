use crate::error::{Error, Result};
use crate::model::Outcome;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Writes one JSON file per successful outcome into a zip archive.
///
/// Entry names come from the PURL with `/` replaced by `_`, plus `.json`.
/// The archive is built in memory and only written out once at least one
/// entry exists; zero successes is an error and leaves no file behind.
pub fn write_zip(outcomes: &[Outcome], path: &Path) -> Result<()> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut entries = 0;
    for outcome in outcomes {
        let Some(record) = outcome.scorecard.as_ref().filter(|_| outcome.success) else {
            tracing::debug!(purl = %outcome.purl, "skipping outcome without scorecard data");
            continue;
        };

        let name = format!("{}.json", outcome.purl.replace('/', "_"));
        writer.start_file(name, options)?;
        let json = serde_json::to_string_pretty(record)?;
        writer
            .write_all(json.as_bytes())
            .map_err(|e| Error::Serialization(format!("failed to write zip entry: {e}")))?;
        entries += 1;
    }

    if entries == 0 {
        return Err(Error::Serialization(
            "no valid results to write to zip file".to_string(),
        ));
    }

    let cursor = writer.finish()?;
    std::fs::write(path, cursor.into_inner())
        .map_err(|e| Error::Serialization(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RepoId, ScorecardRecord, ScorecardVersion};
    use std::fs::File;
    use zip::ZipArchive;

    fn success(purl: &str) -> Outcome {
        let record = ScorecardRecord {
            date: "2024-05-01".to_string(),
            repo: RepoId {
                name: "github.com/a/b".to_string(),
                commit: String::new(),
            },
            scorecard: ScorecardVersion {
                version: "v5.0.0".to_string(),
                commit: String::new(),
            },
            score: 6.1,
            checks: Vec::new(),
        };
        Outcome::success(purl, record, "https://github.com/a/b")
    }

    #[test]
    fn test_write_zip_one_entry_per_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.zip");
        let outcomes = vec![
            success("pkg:npm/%40colors/colors@1.5.0"),
            Outcome::failure("pkg:invalid/invalid@0.0.0", "GitHub URL not found"),
            success("pkg:nuget/castle.core@5.1.1"),
        ];

        write_zip(&outcomes, &path).unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let entry = archive
            .by_name("pkg:npm_%40colors_colors@1.5.0.json")
            .unwrap();
        assert!(entry.size() > 0);
    }

    #[test]
    fn test_write_zip_fails_with_zero_successes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.zip");
        let outcomes = vec![Outcome::failure("pkg:npm/a@1.0.0", "boom")];

        let err = write_zip(&outcomes, &path).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("no valid results"));
        assert!(!path.exists());
    }
}
