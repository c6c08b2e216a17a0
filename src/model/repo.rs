use serde::{Deserialize, Serialize};

/// A GitHub repository resolved from a PURL.
///
/// `owner` and `repo` are always non-empty and only ever derived from URLs
/// whose host is exactly `github.com`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    /// The PURL this repository was resolved from.
    pub purl: String,
}

impl RepoRef {
    /// Parses a GitHub URL into a RepoRef, keeping the originating PURL.
    ///
    /// Accepts an optional `https://` prefix and ignores path segments past
    /// `owner/repo`. Returns `None` for anything that is not a plausible
    /// `github.com/<owner>/<repo>` URL.
    pub fn from_github_url(url: &str, purl: impl Into<String>) -> Option<Self> {
        let trimmed = url.trim();
        let rest = trimmed.strip_prefix("https://").unwrap_or(trimmed);
        let rest = rest.strip_prefix("github.com/")?;

        let mut parts = rest.split('/');
        let owner = parts.next()?.trim();
        let repo = parts.next()?.trim();
        if owner.is_empty() || repo.is_empty() {
            return None;
        }

        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            purl: purl.into(),
        })
    }

    /// Repo name as it appears in scorecard data, e.g. `github.com/DABH/colors.js`.
    pub fn full_name(&self) -> String {
        format!("github.com/{}/{}", self.owner, self.repo)
    }

    /// Canonical HTTPS URL for the repository.
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_github_url() {
        let cases = [
            ("github.com/owner/repo", Some(("owner", "repo"))),
            ("github.com/owner/repo/extra", Some(("owner", "repo"))),
            ("github.com/owner", None),
            ("notgithub.com/owner/repo", None),
            ("github.com/", None),
            ("", None),
            (
                "https://github.com/DABH/colors.js",
                Some(("DABH", "colors.js")),
            ),
            (
                "https://github.com/castleproject/Core",
                Some(("castleproject", "Core")),
            ),
        ];

        for (input, expected) in cases {
            let parsed = RepoRef::from_github_url(input, "pkg:npm/x@1.0.0");
            match expected {
                Some((owner, repo)) => {
                    let parsed = parsed.unwrap_or_else(|| panic!("expected parse for {input:?}"));
                    assert_eq!(parsed.owner, owner);
                    assert_eq!(parsed.repo, repo);
                    assert_eq!(parsed.purl, "pkg:npm/x@1.0.0");
                }
                None => assert!(parsed.is_none(), "expected no parse for {input:?}"),
            }
        }
    }

    #[test]
    fn test_full_name_and_html_url() {
        let r = RepoRef::from_github_url("https://github.com/DABH/colors.js", "p").unwrap();
        assert_eq!(r.full_name(), "github.com/DABH/colors.js");
        assert_eq!(r.html_url(), "https://github.com/DABH/colors.js");
        assert_eq!(r.to_string(), "DABH/colors.js");
    }
}
