//! The resolve/fetch/aggregate pipeline.

use crate::error::Result;
use crate::fetcher::ScorecardFetcher;
use crate::model::{Outcome, RepoRef};
use crate::resolver::PurlResolver;

/// Drives the pipeline: resolve PURLs to repos, fetch scorecard data, and
/// fold everything into one [`Outcome`] per input PURL.
pub struct Processor {
    resolver: PurlResolver,
    fetcher: Box<dyn ScorecardFetcher>,
}

impl Processor {
    pub fn new(resolver: PurlResolver, fetcher: Box<dyn ScorecardFetcher>) -> Self {
        Self { resolver, fetcher }
    }

    /// Runs the pipeline over the given PURLs.
    ///
    /// Item-level failures (unresolvable PURL, per-repo fetch error, missing
    /// scorecard data) are recorded in that item's Outcome and processing
    /// continues. Configuration errors and bulk-mode batch failures abort the
    /// whole run.
    pub async fn run(&self, purls: &[String]) -> Result<Vec<Outcome>> {
        // Configuration problems must surface before any network call.
        self.fetcher.preflight()?;

        let resolved = match self.resolver.resolve(purls).await {
            Ok(map) => map,
            Err(e) => {
                // The lookup call covers every purl, so its failure lands on
                // each of them rather than aborting the run.
                return Ok(purls
                    .iter()
                    .map(|purl| Outcome::failure(purl, format!("Error looking up purl: {e}")))
                    .collect());
            }
        };

        let mut outcomes = Vec::with_capacity(purls.len());
        let mut repos = Vec::new();
        for purl in purls {
            let github_url = resolved.get(purl).map(String::as_str).unwrap_or_default();
            if github_url.is_empty() {
                outcomes.push(Outcome::failure(purl, "GitHub URL not found for purl"));
                continue;
            }
            match RepoRef::from_github_url(github_url, purl) {
                Some(repo) => repos.push(repo),
                None => outcomes.push(Outcome::failure(
                    purl,
                    format!("Invalid GitHub URL: {github_url}"),
                )),
            }
        }

        tracing::info!(
            resolved = repos.len(),
            total = purls.len(),
            source = self.fetcher.name(),
            "resolved purls: {:?}",
            repos.iter().map(|r| r.purl.as_str()).collect::<Vec<_>>()
        );

        if repos.is_empty() {
            return Ok(outcomes);
        }

        let fetched = self.fetcher.fetch(&repos).await?;
        for item in fetched {
            let outcome = if let Some(error) = item.error {
                Outcome::failure(
                    item.repo.purl,
                    format!("Error fetching scorecard data: {error}"),
                )
            } else if let Some(record) = item.record {
                let github_url = item.repo.html_url();
                Outcome::success(item.repo.purl, record, github_url)
            } else {
                Outcome::failure(item.repo.purl, "Scorecard data not found")
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fetcher::{BigQueryFetcher, RestFetcher};

    fn lookup_body(purl: &str, github_url: &str) -> String {
        let link = if github_url.is_empty() {
            String::new()
        } else {
            format!(r#"{{"label": "SOURCE_REPO", "url": "{github_url}"}}"#)
        };
        format!(
            r#"{{"responses": [{{
                "request": {{"purl": "{purl}"}},
                "result": {{"version": {{"links": [{link}]}}, "package": {{"links": []}}}}
            }}]}}"#
        )
    }

    fn processor(lookup_url: String, scorecard_url: String) -> Processor {
        Processor::new(
            PurlResolver::new(lookup_url),
            Box::new(RestFetcher::new(scorecard_url)),
        )
    }

    #[tokio::test]
    async fn test_run_success_end_to_end() {
        let mut lookup = mockito::Server::new_async().await;
        let mut scorecard = mockito::Server::new_async().await;

        lookup
            .mock("POST", "/purlbatch")
            .with_status(200)
            .with_body(lookup_body(
                "pkg:npm/%40colors/colors@1.5.0",
                "https://github.com/DABH/colors.js",
            ))
            .create_async()
            .await;
        scorecard
            .mock("GET", "/projects/github.com/DABH/colors.js")
            .with_status(200)
            .with_body(
                r#"{"date":"2024-05-01","repo":{"name":"github.com/DABH/colors.js"},"scorecard":{"version":"v5.0.0"},"score":7.2}"#,
            )
            .create_async()
            .await;

        let p = processor(format!("{}/purlbatch", lookup.url()), scorecard.url());
        let outcomes = p
            .run(&["pkg:npm/%40colors/colors@1.5.0".to_string()])
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        let outcome = &outcomes[0];
        assert!(outcome.success);
        assert_eq!(
            outcome.github_url.as_deref(),
            Some("https://github.com/DABH/colors.js")
        );
        assert_eq!(outcome.scorecard.as_ref().unwrap().score, 7.2);
        assert!(outcome.observed_at.is_some());
    }

    #[tokio::test]
    async fn test_run_unresolved_purl_gets_failure_outcome() {
        let mut lookup = mockito::Server::new_async().await;
        lookup
            .mock("POST", "/purlbatch")
            .with_status(200)
            .with_body(lookup_body("pkg:invalid/invalid@0.0.0", ""))
            .create_async()
            .await;

        let p = processor(
            format!("{}/purlbatch", lookup.url()),
            "http://127.0.0.1:9".to_string(),
        );
        let outcomes = p
            .run(&["pkg:invalid/invalid@0.0.0".to_string()])
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].success);
        assert!(outcomes[0]
            .error
            .as_deref()
            .unwrap()
            .contains("GitHub URL not found"));
    }

    #[tokio::test]
    async fn test_run_missing_scorecard_data() {
        let mut lookup = mockito::Server::new_async().await;
        let mut scorecard = mockito::Server::new_async().await;

        lookup
            .mock("POST", "/purlbatch")
            .with_status(200)
            .with_body(lookup_body(
                "pkg:npm/ghost@1.0.0",
                "https://github.com/owner/ghost",
            ))
            .create_async()
            .await;
        scorecard
            .mock("GET", "/projects/github.com/owner/ghost")
            .with_status(404)
            .create_async()
            .await;

        let p = processor(format!("{}/purlbatch", lookup.url()), scorecard.url());
        let outcomes = p.run(&["pkg:npm/ghost@1.0.0".to_string()]).await.unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].success);
        assert_eq!(outcomes[0].error.as_deref(), Some("Scorecard data not found"));
    }

    #[tokio::test]
    async fn test_run_lookup_failure_lands_on_every_purl() {
        let mut lookup = mockito::Server::new_async().await;
        lookup
            .mock("POST", "/purlbatch")
            .with_status(500)
            .create_async()
            .await;

        let p = processor(
            format!("{}/purlbatch", lookup.url()),
            "http://127.0.0.1:9".to_string(),
        );
        let purls = vec![
            "pkg:npm/a@1.0.0".to_string(),
            "pkg:npm/b@2.0.0".to_string(),
        ];
        let outcomes = p.run(&purls).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert!(!outcome.success);
            assert!(outcome
                .error
                .as_deref()
                .unwrap()
                .contains("Error looking up purl"));
        }
    }

    #[tokio::test]
    async fn test_run_bulk_mode_without_credentials_fails_before_network() {
        // The resolver endpoint is unroutable; preflight must fail first.
        let p = Processor::new(
            PurlResolver::new("http://127.0.0.1:9/purlbatch"),
            Box::new(BigQueryFetcher::new(Default::default(), "")),
        );
        let err = p.run(&["pkg:npm/a@1.0.0".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("credentials file"));
    }
}
