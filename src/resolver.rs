//! PURL to GitHub repository resolution via the deps.dev batch lookup API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

use crate::error::{Error, Result};

/// Maximum number of PURLs the lookup service accepts per request.
const BATCH_SIZE: usize = 100;

/// Resolves PURLs to canonical GitHub HTTPS URLs.
pub struct PurlResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl PurlResolver {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Resolves each PURL to a GitHub HTTPS URL, or the empty string when no
    /// qualifying link exists. An unresolved PURL is not an error; a failed
    /// batch request is, and it fails the whole call.
    pub async fn resolve(&self, purls: &[String]) -> Result<HashMap<String, String>> {
        let mut resolved = HashMap::with_capacity(purls.len());

        for chunk in purls.chunks(BATCH_SIZE) {
            let request = LookupBatchRequest {
                requests: chunk
                    .iter()
                    .map(|purl| LookupRequest { purl: purl.clone() })
                    .collect(),
            };

            let response = self
                .client
                .post(&self.endpoint)
                .json(&request)
                .send()
                .await
                .map_err(|e| Error::Resolution(format!("lookup request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Resolution(format!(
                    "lookup API returned {status}: {body}"
                )));
            }

            let batch: LookupBatchResponse = response
                .json()
                .await
                .map_err(|e| Error::Resolution(format!("failed to decode lookup response: {e}")))?;

            for entry in batch.responses {
                let github_url = source_repo_url(&entry.result);
                resolved.insert(entry.request.purl, github_url);
            }
        }

        Ok(resolved)
    }
}

/// Picks the SOURCE_REPO link out of a lookup result, preferring the
/// version-level links over the package-level ones, and canonicalizes it.
/// Returns the empty string when no GitHub link qualifies.
fn source_repo_url(result: &LookupResult) -> String {
    for links in [&result.version.links, &result.package.links] {
        for link in links {
            if link.label == "SOURCE_REPO" && is_github_url(&link.url) {
                if let Some(url) = to_https_url(&link.url) {
                    return url;
                }
            }
        }
    }
    String::new()
}

fn is_github_url(repo_url: &str) -> bool {
    match Url::parse(repo_url) {
        Ok(parsed) => parsed.host_str() == Some("github.com"),
        Err(_) => false,
    }
}

/// Converts a GitHub repo URL (including `git+ssh` forms) to canonical HTTPS,
/// stripping a trailing `.git` from the path.
///
/// Example: `git+ssh://git@github.com/DABH/colors.js.git` becomes
/// `https://github.com/DABH/colors.js`.
fn to_https_url(git_url: &str) -> Option<String> {
    let parsed = Url::parse(git_url).ok()?;
    let path = parsed.path().strip_suffix(".git").unwrap_or(parsed.path());
    Some(format!("https://github.com{path}"))
}

#[derive(Serialize)]
struct LookupBatchRequest {
    requests: Vec<LookupRequest>,
}

#[derive(Serialize, Deserialize)]
struct LookupRequest {
    purl: String,
}

#[derive(Deserialize)]
struct LookupBatchResponse {
    #[serde(default)]
    responses: Vec<LookupEntry>,
}

#[derive(Deserialize)]
struct LookupEntry {
    request: LookupRequest,
    #[serde(default)]
    result: LookupResult,
}

#[derive(Deserialize, Default)]
struct LookupResult {
    #[serde(default)]
    version: LookupLinks,
    #[serde(default)]
    package: LookupLinks,
}

#[derive(Deserialize, Default)]
struct LookupLinks {
    #[serde(default)]
    links: Vec<LookupLink>,
}

#[derive(Deserialize)]
struct LookupLink {
    label: String,
    url: String,
}
