//! Offline detection from a GitHub release asset URL.
//!
//! Release assets live at `https://github.com/{owner}/{repo}/releases/download/{tag}/{file}`,
//! which is enough to derive the publisher, package, support and release notes pages. Fields
//! that need the hosting API (license, descriptions, release notes text) are left absent.

use std::future::Future;

use url::Url;

use super::{BoxError, DetectedField, Probe};

const GITHUB_HOST: &str = "github.com";

/// A probe deriving URL fields from a GitHub release asset URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubReleaseProbe {
    owner: String,
    repo: String,
    tag: String,
}

impl GitHubReleaseProbe {
    /// Recognize a release asset URL, returning `None` for anything else.
    pub fn from_url(url: &Url) -> Option<Self> {
        if url.host_str()? != GITHUB_HOST {
            return None;
        }
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [owner, repo, "releases", "download", tag, _file, ..] => Some(GitHubReleaseProbe {
                owner: (*owner).to_owned(),
                repo: (*repo).to_owned(),
                tag: (*tag).to_owned(),
            }),
            _ => None,
        }
    }

    fn derive(&self, field: DetectedField) -> Option<String> {
        let Self { owner, repo, tag } = self;
        let base = format!("https://{GITHUB_HOST}");
        match field {
            DetectedField::PublisherUrl => Some(format!("{base}/{owner}")),
            DetectedField::PackageUrl => Some(format!("{base}/{owner}/{repo}")),
            DetectedField::PublisherSupportUrl => Some(format!("{base}/{owner}/{repo}/issues")),
            DetectedField::ReleaseNotesUrl => {
                Some(format!("{base}/{owner}/{repo}/releases/tag/{tag}"))
            },
            _ => None,
        }
    }
}

impl Probe for GitHubReleaseProbe {
    fn probe(
        &self,
        field: DetectedField,
    ) -> impl Future<Output = Result<Option<String>, BoxError>> + Send {
        let value = self.derive(field);
        async move { Ok(value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_release_assets() -> anyhow::Result<()> {
        let url = Url::parse(
            "https://github.com/JanDeDobbeleer/oh-my-posh/releases/download/v19.0.0/install-amd64.exe",
        )?;
        let probe = GitHubReleaseProbe::from_url(&url).ok_or(anyhow::anyhow!("not recognized"))?;
        assert_eq!(
            probe.derive(DetectedField::ReleaseNotesUrl).as_deref(),
            Some("https://github.com/JanDeDobbeleer/oh-my-posh/releases/tag/v19.0.0")
        );
        assert_eq!(
            probe.derive(DetectedField::PublisherUrl).as_deref(),
            Some("https://github.com/JanDeDobbeleer")
        );
        assert_eq!(probe.derive(DetectedField::License), None);
        Ok(())
    }

    #[test]
    fn rejects_other_urls() -> anyhow::Result<()> {
        for url in [
            "https://gitlab.com/owner/repo/releases/download/v1/file.exe",
            "https://github.com/owner/repo/archive/refs/tags/v1.zip",
            "https://github.com/owner/repo",
        ] {
            assert_eq!(GitHubReleaseProbe::from_url(&Url::parse(url)?), None);
        }
        Ok(())
    }
}
