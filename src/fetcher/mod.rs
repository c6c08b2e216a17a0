mod bigquery;
mod rest;

pub use bigquery::BigQueryFetcher;
pub use rest::RestFetcher;

use crate::error::Result;
use crate::model::{RepoRef, ScorecardRecord};
use async_trait::async_trait;

/// Per-repo fetch result.
///
/// `record` is `None` when the data source had no scorecard for the repo;
/// `error` carries a failure isolated to this one repo.
#[derive(Debug)]
pub struct RepoScorecard {
    pub repo: RepoRef,
    pub record: Option<ScorecardRecord>,
    pub error: Option<String>,
}

/// A source of scorecard records for a set of GitHub repositories.
///
/// Implementations isolate per-repo failures into [`RepoScorecard::error`]
/// where they can; an `Err` from [`ScorecardFetcher::fetch`] means the whole
/// batch failed as one indivisible request.
#[async_trait]
pub trait ScorecardFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Validates configuration. Called before any network request is issued.
    fn preflight(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch(&self, repos: &[RepoRef]) -> Result<Vec<RepoScorecard>>;
}
