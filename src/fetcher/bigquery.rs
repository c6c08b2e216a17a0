//! Bulk-mode scorecard retrieval via a BigQuery query over the OpenSSF
//! scorecard cron dataset.
//!
//! The whole repo set goes out as one query, so a failure here is a failure
//! of the entire batch. Rows are matched back to their repos by normalized
//! repo-name equality.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

use crate::config::BigQueryConfig;
use crate::error::{Error, Result};
use crate::model::{CheckResult, RepoId, RepoRef, ScorecardRecord, ScorecardVersion};

use super::{RepoScorecard, ScorecardFetcher};

const BIGQUERY_API: &str = "https://bigquery.googleapis.com/bigquery/v2";
const BIGQUERY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery.readonly";

pub struct BigQueryFetcher {
    client: reqwest::Client,
    config: BigQueryConfig,
    credentials_file: PathBuf,
}

impl BigQueryFetcher {
    pub fn new(config: BigQueryConfig, credentials_file: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            credentials_file: credentials_file.into(),
        }
    }

    /// Runs one grouped, date-descending query over all repos and returns the
    /// decoded rows. Requires a non-empty repo list and a credentials file;
    /// both are checked before any network call.
    pub async fn fetch_many(&self, repos: &[RepoRef]) -> Result<Vec<ScorecardRecord>> {
        self.preflight()?;
        if repos.is_empty() {
            return Err(Error::Configuration(
                "at least one repo is required".to_string(),
            ));
        }

        let token = self.access_token().await?;
        let sql = self.build_query(repos);
        tracing::debug!(%sql, "running bigquery query");

        let url = format!("{BIGQUERY_API}/projects/{}/queries", self.config.project);
        let body = serde_json::json!({
            "query": sql,
            "useLegacySql": false,
            "timeoutMs": 60_000,
        });
        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("bigquery request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!("bigquery returned {status}: {body}")));
        }

        let mut page: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("failed to decode bigquery response: {e}")))?;
        if !page.job_complete {
            return Err(Error::Fetch(
                "bigquery job did not complete within the timeout".to_string(),
            ));
        }

        let job = page.job_reference.take();
        let mut rows = std::mem::take(&mut page.rows);
        let mut page_token = page.page_token.take();

        while let Some(next) = page_token {
            let job = job
                .as_ref()
                .ok_or_else(|| Error::Fetch("paged response missing job reference".to_string()))?;
            let url = format!(
                "{BIGQUERY_API}/projects/{}/queries/{}",
                self.config.project, job.job_id
            );
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .query(&[("pageToken", next.as_str())]);
            if let Some(location) = &job.location {
                request = request.query(&[("location", location.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| Error::Fetch(format!("bigquery page request failed: {e}")))?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Fetch(format!("bigquery returned {status}: {body}")));
            }

            let mut next_page: QueryResponse = response
                .json()
                .await
                .map_err(|e| Error::Fetch(format!("failed to decode bigquery response: {e}")))?;
            rows.append(&mut next_page.rows);
            page_token = next_page.page_token.take();
        }

        rows.iter().map(parse_row).collect()
    }

    async fn access_token(&self) -> Result<String> {
        let key = yup_oauth2::read_service_account_key(&self.credentials_file)
            .await
            .map_err(|e| {
                Error::Configuration(format!(
                    "failed to read credentials file {}: {e}",
                    self.credentials_file.display()
                ))
            })?;
        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| Error::Fetch(format!("failed to build authenticator: {e}")))?;
        let token = auth
            .token(&[BIGQUERY_SCOPE])
            .await
            .map_err(|e| Error::Fetch(format!("failed to obtain access token: {e}")))?;
        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| Error::Fetch("access token is empty".to_string()))
    }

    /// Builds the grouped query. One row per (date, repo, commit, scorecard
    /// version/commit, score) with the per-check structs aggregated into a
    /// JSON string, newest first. A single repo gets a bare equality instead
    /// of a one-armed disjunction.
    fn build_query(&self, repos: &[RepoRef]) -> String {
        let where_clause = if repos.len() == 1 {
            format!(r#"repo.name = "{}""#, repos[0].full_name())
        } else {
            repos
                .iter()
                .map(|r| format!(r#"repo.name = "{}""#, r.full_name()))
                .collect::<Vec<_>>()
                .join(" OR ")
        };

        format!(
            r#"SELECT
  FORMAT_DATE("%Y-%m-%d", date) AS date,
  repo.name AS repo_name,
  repo.commit AS repo_commit,
  scorecard.version AS scorecard_version,
  scorecard.commit AS scorecard_commit,
  a.score,
  TO_JSON_STRING(ARRAY_AGG(STRUCT(c.name, c.score, c.reason))) AS checks
FROM `{}.{}.{}` a
LEFT JOIN UNNEST(checks) AS c
WHERE {}
GROUP BY date, repo.name, repo.commit, scorecard.version, scorecard.commit, a.score
ORDER BY date DESC"#,
            self.config.project, self.config.dataset, self.config.table, where_clause
        )
    }
}

#[async_trait]
impl ScorecardFetcher for BigQueryFetcher {
    fn name(&self) -> &'static str {
        "bigquery"
    }

    fn preflight(&self) -> Result<()> {
        if self.credentials_file.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "credentials file is required".to_string(),
            ));
        }
        Ok(())
    }

    async fn fetch(&self, repos: &[RepoRef]) -> Result<Vec<RepoScorecard>> {
        let records = self.fetch_many(repos).await?;

        // Rows are date-descending, so the first match per repo is the newest.
        Ok(repos
            .iter()
            .map(|repo| {
                let want = normalize_repo_name(&repo.full_name());
                let record = records
                    .iter()
                    .find(|r| normalize_repo_name(&r.repo.name) == want)
                    .cloned();
                RepoScorecard {
                    repo: repo.clone(),
                    record,
                    error: None,
                }
            })
            .collect())
    }
}

/// Case-insensitive, trailing-slash-insensitive form used to join query rows
/// back to their RepoRef.
fn normalize_repo_name(name: &str) -> String {
    name.trim().trim_end_matches('/').to_ascii_lowercase()
}

fn parse_row(row: &TableRow) -> Result<ScorecardRecord> {
    let score = cell_str(row, 5)
        .parse::<f64>()
        .map_err(|e| Error::Fetch(format!("invalid score in bigquery row: {e}")))?;
    let checks: Vec<CheckResult> = serde_json::from_str(&cell_str(row, 6))
        .map_err(|e| Error::Fetch(format!("invalid checks in bigquery row: {e}")))?;

    Ok(ScorecardRecord {
        date: cell_str(row, 0),
        repo: RepoId {
            name: cell_str(row, 1),
            commit: cell_str(row, 2),
        },
        scorecard: ScorecardVersion {
            version: cell_str(row, 3),
            commit: cell_str(row, 4),
        },
        score,
        checks,
    })
}

fn cell_str(row: &TableRow, index: usize) -> String {
    row.f
        .get(index)
        .and_then(|cell| cell.v.as_ref())
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Response shape shared by `jobs.query` and `jobs.getQueryResults`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    job_reference: Option<JobReference>,
    #[serde(default)]
    rows: Vec<TableRow>,
    page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    #[serde(default)]
    job_id: String,
    location: Option<String>,
}

#[derive(Deserialize)]
struct TableRow {
    #[serde(default)]
    f: Vec<TableCell>,
}

#[derive(Deserialize)]
struct TableCell {
    v: Option<serde_json::Value>,
}
