use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ScorecardRecord;

/// Per-PURL pipeline result.
///
/// Exactly one Outcome is produced per input PURL. `success` and `error` are
/// mutually exclusive; use the [`Outcome::success`] and [`Outcome::failure`]
/// constructors to keep that invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub purl: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scorecard: Option<ScorecardRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "github_url", skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    /// When the record was captured, not when it was computed upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl Outcome {
    pub fn success(
        purl: impl Into<String>,
        scorecard: ScorecardRecord,
        github_url: impl Into<String>,
    ) -> Self {
        Self {
            purl: purl.into(),
            success: true,
            scorecard: Some(scorecard),
            error: None,
            github_url: Some(github_url.into()),
            observed_at: Some(Utc::now()),
        }
    }

    pub fn failure(purl: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            purl: purl.into(),
            success: false,
            scorecard: None,
            error: Some(error.into()),
            github_url: None,
            observed_at: None,
        }
    }
}
