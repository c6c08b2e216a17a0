//! Point-mode scorecard retrieval via the scorecard.dev REST API.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::StatusCode;

use crate::error::{Error, Result};
use crate::model::{RepoRef, ScorecardRecord};

use super::{RepoScorecard, ScorecardFetcher};

/// Upper bound on in-flight REST requests when fetching a batch of repos.
const FETCH_CONCURRENCY: usize = 8;

pub struct RestFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl RestFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetches the scorecard record for one repository.
    ///
    /// A 404 means the repo has no scorecard data and is not an error; any
    /// other non-200 status, transport failure, or decode failure is.
    pub async fn fetch_one(&self, owner: &str, repo: &str) -> Result<Option<ScorecardRecord>> {
        let url = format!("{}/projects/github.com/{owner}/{repo}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("scorecard request failed: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::OK => {
                let record = response.json::<ScorecardRecord>().await.map_err(|e| {
                    Error::Fetch(format!("failed to decode scorecard response: {e}"))
                })?;
                Ok(Some(record))
            }
            status => Err(Error::Fetch(format!(
                "scorecard API returned {status} for {owner}/{repo}"
            ))),
        }
    }
}

#[async_trait]
impl ScorecardFetcher for RestFetcher {
    fn name(&self) -> &'static str {
        "scorecard.dev"
    }

    async fn fetch(&self, repos: &[RepoRef]) -> Result<Vec<RepoScorecard>> {
        // Bounded fan-out; results come back in input order and per-repo
        // failures stay isolated to their RepoScorecard.
        let results = stream::iter(repos.iter().cloned())
            .map(|repo| async move {
                match self.fetch_one(&repo.owner, &repo.repo).await {
                    Ok(record) => RepoScorecard {
                        repo,
                        record,
                        error: None,
                    },
                    Err(e) => RepoScorecard {
                        repo,
                        record: None,
                        error: Some(e.to_string()),
                    },
                }
            })
            .buffered(FETCH_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;

        Ok(results)
    }
}
