use serde::{Deserialize, Serialize};

/// One OpenSSF Scorecard assessment for a repository.
///
/// The serde shape mirrors the scorecard.dev REST payload so a 200 response
/// body decodes directly into this type. BigQuery rows are mapped into the
/// same shape. Check ordering follows whatever the data source returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardRecord {
    pub date: String,
    pub repo: RepoId,
    pub scorecard: ScorecardVersion,
    pub score: f64,
    #[serde(default)]
    pub checks: Vec<CheckResult>,
}

/// Repository identity as recorded in scorecard data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoId {
    /// Repo name in `github.com/<owner>/<repo>` form.
    pub name: String,
    #[serde(default)]
    pub commit: String,
}

/// Version of the scorecard tool that produced a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardVersion {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub commit: String,
}

/// A single per-check sub-score within a scorecard record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub score: i32,
    #[serde(default)]
    pub reason: String,
    /// Present in REST payloads, absent in BigQuery rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<CheckDocumentation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckDocumentation {
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub url: String,
}
