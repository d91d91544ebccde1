//! # Detection
//!
//! Values probed from the package's source-hosting platform. Each [`DetectedField`] is
//! resolved lazily and independently: awaiting one field never forces another, and a field
//! is probed at most once per [`Detector`], with the outcome (possibly absent) cached for the
//! rest of the run.
//!
//! Detection is best effort. A probe that fails, times out, returns a blank value or returns
//! a malformed URL for a URL field resolves to absent; the failure is logged and never reaches
//! the resolver.
//!
//! ## Probes
//!
//! A [`Probe`] is the seam to whatever performs the actual lookup. This crate ships two:
//! - [`StaticProbe`] serves fixed values, e.g. loaded from a TOML table.
//! - [`GitHubReleaseProbe`] derives the URL fields from a GitHub release asset URL without
//!   touching the network.
//!
//! Probes compose: `Option<P>` is a probe that is either `P` or absent everywhere, and a
//! pair `(A, B)` consults `B` only where `A` found nothing.

mod github;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::Instrument;
use url::Url;

pub use self::github::GitHubReleaseProbe;

const FIELD_COUNT: usize = 9;

/// A boxed error returned by probes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

//================================================================================================
// Types
//================================================================================================

/// The fields a [`Probe`] can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetectedField {
    /// The publisher's home page.
    PublisherUrl,
    /// The publisher's support page.
    PublisherSupportUrl,
    /// The privacy policy page.
    PrivacyUrl,
    /// The package home page.
    PackageUrl,
    /// The license identifier.
    License,
    /// The license page.
    LicenseUrl,
    /// The one-line summary.
    ShortDescription,
    /// Release notes text for the release.
    ReleaseNotes,
    /// The release notes page.
    ReleaseNotesUrl,
}

/// Performs the lookup for a single detected field.
pub trait Probe: Sync {
    /// Look up `field`, returning `Ok(None)` when the platform has nothing for it.
    fn probe(
        &self,
        field: DetectedField,
    ) -> impl Future<Output = Result<Option<String>, BoxError>> + Send;
}

/// A probe answering from a fixed table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticProbe {
    values: HashMap<DetectedField, String>,
}

/// Errors raised while building a [`StaticProbe`].
#[derive(thiserror::Error, Debug)]
pub enum StaticProbeError {
    /// The table names a field that cannot be detected.
    #[error("'{0}' is not a detectable field")]
    UnknownField(String),
    /// The table is not valid TOML or holds non-string values.
    #[error(transparent)]
    De(#[from] toml_edit::de::Error),
}

#[derive(Debug)]
enum Detected {
    Text(String),
    Url(Url),
}

/// Per-run cache of detected values over a [`Probe`].
pub struct Detector<P> {
    probe: P,
    timeout: Option<Duration>,
    cells: [OnceCell<Option<Detected>>; FIELD_COUNT],
}

//================================================================================================
// Impls
//================================================================================================

impl DetectedField {
    /// Every detectable field.
    pub const ALL: [DetectedField; FIELD_COUNT] = [
        DetectedField::PublisherUrl,
        DetectedField::PublisherSupportUrl,
        DetectedField::PrivacyUrl,
        DetectedField::PackageUrl,
        DetectedField::License,
        DetectedField::LicenseUrl,
        DetectedField::ShortDescription,
        DetectedField::ReleaseNotes,
        DetectedField::ReleaseNotesUrl,
    ];

    /// The snake_case key naming this field in tables.
    pub fn key(self) -> &'static str {
        match self {
            DetectedField::PublisherUrl => "publisher_url",
            DetectedField::PublisherSupportUrl => "publisher_support_url",
            DetectedField::PrivacyUrl => "privacy_url",
            DetectedField::PackageUrl => "package_url",
            DetectedField::License => "license",
            DetectedField::LicenseUrl => "license_url",
            DetectedField::ShortDescription => "short_description",
            DetectedField::ReleaseNotes => "release_notes",
            DetectedField::ReleaseNotesUrl => "release_notes_url",
        }
    }

    /// Whether values of this field must parse as URLs.
    pub fn is_url(self) -> bool {
        !matches!(
            self,
            DetectedField::License | DetectedField::ShortDescription | DetectedField::ReleaseNotes
        )
    }
}

impl fmt::Display for DetectedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DetectedField {
    type Err = StaticProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetectedField::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| StaticProbeError::UnknownField(s.to_owned()))
    }
}

impl StaticProbe {
    /// Build a probe from a table of `field key = "value"` pairs.
    pub fn from_toml(s: &str) -> Result<Self, StaticProbeError> {
        let raw: HashMap<String, String> = toml_edit::de::from_str(s)?;
        raw.into_iter()
            .map(|(k, v)| Ok((k.parse()?, v)))
            .collect::<Result<_, _>>()
            .map(|values| StaticProbe { values })
    }

    /// Answer `field` with `value`.
    pub fn with(mut self, field: DetectedField, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }
}

impl Probe for StaticProbe {
    fn probe(
        &self,
        field: DetectedField,
    ) -> impl Future<Output = Result<Option<String>, BoxError>> + Send {
        let value = self.values.get(&field).cloned();
        async move { Ok(value) }
    }
}

impl<P: Probe> Probe for Option<P> {
    async fn probe(&self, field: DetectedField) -> Result<Option<String>, BoxError> {
        match self {
            Some(p) => p.probe(field).await,
            None => Ok(None),
        }
    }
}

impl<A: Probe, B: Probe> Probe for (A, B) {
    async fn probe(&self, field: DetectedField) -> Result<Option<String>, BoxError> {
        let first = self.0.probe(field).await;
        if let Ok(Some(_)) = first {
            return first;
        }
        match self.1.probe(field).await {
            Ok(None) => first,
            second => second,
        }
    }
}

impl<P: Probe> Detector<P> {
    /// A detector with no per-probe timeout.
    pub fn new(probe: P) -> Self {
        Detector {
            probe,
            timeout: None,
            cells: std::array::from_fn(|_| OnceCell::new()),
        }
    }

    /// Bound every probe by `timeout`; an expired probe resolves to absent.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether `field` has already been resolved in this run.
    pub fn is_resolved(&self, field: DetectedField) -> bool {
        self.cell(field).initialized()
    }

    /// The detected text for a non-URL `field`.
    pub async fn text(&self, field: DetectedField) -> Option<&str> {
        match self.detect(field).await? {
            Detected::Text(s) => Some(s),
            Detected::Url(u) => Some(u.as_str()),
        }
    }

    /// The detected URL for a URL `field`.
    pub async fn url(&self, field: DetectedField) -> Option<&Url> {
        match self.detect(field).await? {
            Detected::Url(u) => Some(u),
            Detected::Text(_) => None,
        }
    }

    /// The detected publisher home page.
    pub async fn publisher_url(&self) -> Option<&Url> {
        self.url(DetectedField::PublisherUrl).await
    }

    /// The detected publisher support page.
    pub async fn publisher_support_url(&self) -> Option<&Url> {
        self.url(DetectedField::PublisherSupportUrl).await
    }

    /// The detected privacy policy page.
    pub async fn privacy_url(&self) -> Option<&Url> {
        self.url(DetectedField::PrivacyUrl).await
    }

    /// The detected package home page.
    pub async fn package_url(&self) -> Option<&Url> {
        self.url(DetectedField::PackageUrl).await
    }

    /// The detected license.
    pub async fn license(&self) -> Option<&str> {
        self.text(DetectedField::License).await
    }

    /// The detected license page.
    pub async fn license_url(&self) -> Option<&Url> {
        self.url(DetectedField::LicenseUrl).await
    }

    /// The detected one-line summary.
    pub async fn short_description(&self) -> Option<&str> {
        self.text(DetectedField::ShortDescription).await
    }

    /// The detected release notes.
    pub async fn release_notes(&self) -> Option<&str> {
        self.text(DetectedField::ReleaseNotes).await
    }

    /// The detected release notes page.
    pub async fn release_notes_url(&self) -> Option<&Url> {
        self.url(DetectedField::ReleaseNotesUrl).await
    }

    fn cell(&self, field: DetectedField) -> &OnceCell<Option<Detected>> {
        &self.cells[field as usize]
    }

    async fn detect(&self, field: DetectedField) -> Option<&Detected> {
        self.cell(field)
            .get_or_init(|| self.run(field))
            .await
            .as_ref()
    }

    async fn run(&self, field: DetectedField) -> Option<Detected> {
        let span = tracing::debug_span!("detect", %field);
        crate::log::probe_spinner(&span, field);

        async {
            let probe = self.probe.probe(field);
            let outcome = match self.timeout {
                Some(limit) => tokio::time::timeout(limit, probe)
                    .await
                    .unwrap_or_else(|_| Err(format!("timed out after {limit:?}").into())),
                None => probe.await,
            };

            let value = match outcome {
                Ok(Some(v)) if !v.trim().is_empty() => v,
                Ok(_) => {
                    tracing::debug!("nothing detected");
                    return None;
                },
                Err(error) => {
                    tracing::warn!(%error, "detection failed, treating as absent");
                    return None;
                },
            };

            if !field.is_url() {
                return Some(Detected::Text(value.trim().to_owned()));
            }
            match Url::parse(value.trim()) {
                Ok(url) => Some(Detected::Url(url)),
                Err(error) => {
                    tracing::warn!(%error, %value, "detected value is not a URL, ignoring");
                    None
                },
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests;
