//! # Field Resolution
//!
//! Decides, field by field, which source supplies the final value of a default locale
//! manifest. Sources are consulted strictly in order and the first one holding a value wins:
//!
//! 1. the [`Session`], where a blank value counts as not supplied
//! 2. the [`PreviousManifest`] snapshot
//! 3. the [`Detector`], awaited only when the field is still unresolved
//! 4. a field-specific default
//!
//! Some fields deviate from the general chain:
//! - `License` and `ShortDescription` take the session value whenever the run set it, even
//!   to an empty string; only an untouched field falls through, ending at an empty string.
//! - `Publisher` and `PackageName` never consult the detector and have no default. Missing
//!   both a session and a previous value is a [`ResolveError::RequiredFieldMissing`].
//! - `Author`, `Copyright`, `Moniker`, `Description` and `Tags` stop after the previous
//!   snapshot, and `Description` is reflowed into one sentence per line.
//! - `ReleaseNotesUrl` skips the previous snapshot, which belongs to another version, and
//!   ends at the locale metadata passed in for the run; `ReleaseNotes` comes only from the
//!   detector or that metadata.
//!
//! The resolver borrows everything it reads and never mutates the session, so resolving a
//! field twice yields the same value.

mod reflow;

use std::fmt;

use thiserror::Error;
use url::Url;

pub use self::reflow::reflow_description;
use crate::detect::{DetectedField, Detector, Probe};
use crate::record::{DefaultLocaleManifest, LocaleFields, Stamp};
use crate::previous::PreviousManifest;
use crate::session::{Session, blank_as_absent};
use crate::validate::switch::InstallerSwitch;

//================================================================================================
// Types
//================================================================================================

/// A contract violation found during resolution.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// A structurally required field has no value in the session or the previous snapshot.
    #[error("required field `{0}` is absent after resolution")]
    RequiredFieldMissing(LocaleField),
}

/// The resolvable fields of a default locale manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocaleField {
    /// The `Publisher` manifest key.
    Publisher,
    /// The `PublisherUrl` manifest key.
    PublisherUrl,
    /// The `PublisherSupportUrl` manifest key.
    PublisherSupportUrl,
    /// The `PrivacyUrl` manifest key.
    PrivacyUrl,
    /// The `Author` manifest key.
    Author,
    /// The `PackageName` manifest key.
    PackageName,
    /// The `PackageUrl` manifest key.
    PackageUrl,
    /// The `License` manifest key.
    License,
    /// The `LicenseUrl` manifest key.
    LicenseUrl,
    /// The `Copyright` manifest key.
    Copyright,
    /// The `CopyrightUrl` manifest key.
    CopyrightUrl,
    /// The `ShortDescription` manifest key.
    ShortDescription,
    /// The `Description` manifest key.
    Description,
    /// The `Moniker` manifest key.
    Moniker,
    /// The `Tags` manifest key.
    Tags,
    /// The `ReleaseNotes` manifest key.
    ReleaseNotes,
    /// The `ReleaseNotesUrl` manifest key.
    ReleaseNotesUrl,
}

/// A resolved value of any field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A plain text value.
    Text(String),
    /// A URL value.
    Url(Url),
    /// A list of text values.
    List(Vec<String>),
}

/// Which source a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Session,
    Previous,
    Detected,
    Parameter,
    Default,
}

/// Resolves fields for one run.
pub struct Resolver<'run, P> {
    session: &'run Session,
    previous: &'run PreviousManifest,
    detector: Option<&'run Detector<P>>,
    stamp: Stamp,
}

//================================================================================================
// Impls
//================================================================================================

impl fmt::Display for LocaleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl<'run, P: Probe> Resolver<'run, P> {
    /// A resolver over the run's sources. Pass `None` to resolve without detection.
    pub fn new(
        session: &'run Session,
        previous: &'run PreviousManifest,
        detector: Option<&'run Detector<P>>,
    ) -> Self {
        Resolver {
            session,
            previous,
            detector,
            stamp: Stamp::default(),
        }
    }

    /// Use `stamp` for the assembled record.
    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }

    /// Resolve a single field; `None` means the field is legitimately absent.
    ///
    /// # Errors
    ///
    /// [`ResolveError::RequiredFieldMissing`] for `Publisher` or `PackageName` when neither the
    /// session nor the previous snapshot has them.
    pub async fn resolve(&self, field: LocaleField) -> Result<Option<FieldValue>, ResolveError> {
        use FieldValue::{List, Text};
        Ok(match field {
            LocaleField::Publisher => Some(Text(self.publisher()?)),
            LocaleField::PackageName => Some(Text(self.package_name()?)),
            LocaleField::PublisherUrl => self.publisher_url().await.map(FieldValue::Url),
            LocaleField::PublisherSupportUrl => self.publisher_support_url().await.map(FieldValue::Url),
            LocaleField::PrivacyUrl => self.privacy_url().await.map(FieldValue::Url),
            LocaleField::PackageUrl => self.package_url().await.map(FieldValue::Url),
            LocaleField::LicenseUrl => self.license_url().await.map(FieldValue::Url),
            LocaleField::CopyrightUrl => self.copyright_url().map(FieldValue::Url),
            LocaleField::ReleaseNotesUrl => self.release_notes_url().await.map(FieldValue::Url),
            LocaleField::License => Some(Text(self.license().await)),
            LocaleField::ShortDescription => Some(Text(self.short_description().await)),
            LocaleField::Author => self.author().map(Text),
            LocaleField::Copyright => self.copyright().map(Text),
            LocaleField::Moniker => self.moniker().map(Text),
            LocaleField::Description => self.description().map(Text),
            LocaleField::ReleaseNotes => self.release_notes().await.map(Text),
            LocaleField::Tags => self.tags().map(List),
        })
    }

    /// Resolve every field and assemble the record.
    ///
    /// Required fields are checked before any detection is awaited; detected fields are then
    /// resolved concurrently.
    ///
    /// # Errors
    ///
    /// Fails fast with [`ResolveError::RequiredFieldMissing`].
    pub async fn resolve_all(&self) -> Result<DefaultLocaleManifest, ResolveError> {
        let publisher = self.publisher()?;
        let package_name = self.package_name()?;

        let (
            publisher_url,
            publisher_support_url,
            privacy_url,
            package_url,
            license,
            license_url,
            short_description,
            release_notes,
            release_notes_url,
        ) = tokio::join!(
            self.publisher_url(),
            self.publisher_support_url(),
            self.privacy_url(),
            self.package_url(),
            self.license(),
            self.license_url(),
            self.short_description(),
            self.release_notes(),
            self.release_notes_url(),
        );

        let fields = LocaleFields {
            publisher,
            publisher_url,
            publisher_support_url,
            privacy_url,
            author: self.author(),
            package_name,
            package_url,
            license,
            license_url,
            copyright: self.copyright(),
            copyright_url: self.copyright_url(),
            short_description,
            description: self.description(),
            moniker: self.moniker(),
            tags: self.tags(),
            release_notes,
            release_notes_url,
        };

        Ok(DefaultLocaleManifest::assemble(
            self.previous.default_locale(),
            &self.session.identity,
            fields,
            &self.stamp,
        ))
    }

    /// The publisher, from a non-blank session value or else the previous snapshot.
    ///
    /// # Errors
    ///
    /// [`ResolveError::RequiredFieldMissing`] when neither source has one.
    pub fn publisher(&self) -> Result<String, ResolveError> {
        self.required(
            LocaleField::Publisher,
            self.session.publisher.as_deref(),
            self.previous.locale_value(|p| Some(p.publisher.as_str())),
        )
    }

    /// The package name, from a non-blank session value or else the previous snapshot.
    ///
    /// # Errors
    ///
    /// [`ResolveError::RequiredFieldMissing`] when neither source has one.
    pub fn package_name(&self) -> Result<String, ResolveError> {
        self.required(
            LocaleField::PackageName,
            self.session.package_name.as_deref(),
            self.previous.locale_value(|p| Some(p.package_name.as_str())),
        )
    }

    /// Session, previous, then detected.
    pub async fn publisher_url(&self) -> Option<Url> {
        self.url_chain(
            LocaleField::PublisherUrl,
            self.session.publisher_url.as_ref(),
            self.previous.locale_value(|p| p.publisher_url.as_ref()),
            DetectedField::PublisherUrl,
        )
        .await
    }

    /// Session, previous, then detected.
    pub async fn publisher_support_url(&self) -> Option<Url> {
        self.url_chain(
            LocaleField::PublisherSupportUrl,
            self.session.publisher_support_url.as_ref(),
            self.previous.locale_value(|p| p.publisher_support_url.as_ref()),
            DetectedField::PublisherSupportUrl,
        )
        .await
    }

    /// Session, previous, then detected.
    pub async fn privacy_url(&self) -> Option<Url> {
        self.url_chain(
            LocaleField::PrivacyUrl,
            self.session.privacy_url.as_ref(),
            self.previous.locale_value(|p| p.privacy_url.as_ref()),
            DetectedField::PrivacyUrl,
        )
        .await
    }

    /// Session, previous, then detected.
    pub async fn package_url(&self) -> Option<Url> {
        self.url_chain(
            LocaleField::PackageUrl,
            self.session.package_url.as_ref(),
            self.previous.locale_value(|p| p.package_url.as_ref()),
            DetectedField::PackageUrl,
        )
        .await
    }

    /// Session, previous, then detected.
    pub async fn license_url(&self) -> Option<Url> {
        self.url_chain(
            LocaleField::LicenseUrl,
            self.session.license_url.as_ref(),
            self.previous.locale_value(|p| p.license_url.as_ref()),
            DetectedField::LicenseUrl,
        )
        .await
    }

    /// Session, then previous.
    pub fn copyright_url(&self) -> Option<Url> {
        let field = LocaleField::CopyrightUrl;
        if let Some(url) = &self.session.copyright_url {
            return Some(found(field, Source::Session, url.clone()));
        }
        self.previous
            .locale_value(|p| p.copyright_url.as_ref())
            .map(|url| found(field, Source::Previous, url.clone()))
    }

    /// The license, honoring an explicitly set session value even when empty.
    pub async fn license(&self) -> String {
        let field = LocaleField::License;
        if let Some(license) = self.session.license().get() {
            return found(field, Source::Session, license.clone());
        }
        if let Some(license) = self.previous.locale_value(|p| Some(p.license.as_str())) {
            return found(field, Source::Previous, license.to_owned());
        }
        if let Some(license) = self.detected_text(DetectedField::License).await {
            return found(field, Source::Detected, license);
        }
        found(field, Source::Default, String::new())
    }

    /// The short description, honoring an explicitly set session value even when empty.
    pub async fn short_description(&self) -> String {
        let field = LocaleField::ShortDescription;
        if let Some(description) = self.session.short_description().get() {
            return found(field, Source::Session, description.clone());
        }
        if let Some(description) = self
            .previous
            .locale_value(|p| Some(p.short_description.as_str()))
        {
            return found(field, Source::Previous, description.to_owned());
        }
        if let Some(description) = self.detected_text(DetectedField::ShortDescription).await {
            return found(field, Source::Detected, description);
        }
        found(field, Source::Default, String::new())
    }

    /// Non-blank session value, then previous.
    pub fn author(&self) -> Option<String> {
        self.text_chain(
            LocaleField::Author,
            self.session.author.as_deref(),
            self.previous.locale_value(|p| p.author.as_deref()),
        )
    }

    /// Non-blank session value, then previous.
    pub fn copyright(&self) -> Option<String> {
        self.text_chain(
            LocaleField::Copyright,
            self.session.copyright.as_deref(),
            self.previous.locale_value(|p| p.copyright.as_deref()),
        )
    }

    /// Non-blank session value, then previous.
    pub fn moniker(&self) -> Option<String> {
        self.text_chain(
            LocaleField::Moniker,
            self.session.moniker.as_deref(),
            self.previous.locale_value(|p| p.moniker.as_deref()),
        )
    }

    /// The description, reflowed into one sentence per line.
    pub fn description(&self) -> Option<String> {
        self.text_chain(
            LocaleField::Description,
            self.session.description.as_deref(),
            self.previous.locale_value(|p| p.description.as_deref()),
        )
        .map(|d| reflow_description(&d))
    }

    /// Non-empty session tags, then previous.
    pub fn tags(&self) -> Option<Vec<String>> {
        let field = LocaleField::Tags;
        if let Some(tags) = self.session.tags.as_ref().filter(|t| !t.is_empty()) {
            return Some(found(field, Source::Session, tags.clone()));
        }
        self.previous
            .locale_value(|p| p.tags.as_ref())
            .map(|tags| found(field, Source::Previous, tags.clone()))
    }

    /// Session, detected, then the locale metadata of the run.
    pub async fn release_notes_url(&self) -> Option<Url> {
        let field = LocaleField::ReleaseNotesUrl;
        if let Some(url) = &self.session.release_notes_url {
            return Some(found(field, Source::Session, url.clone()));
        }
        if let Some(detector) = self.detector {
            if let Some(url) = detector.release_notes_url().await {
                return Some(found(field, Source::Detected, url.clone()));
            }
        }
        self.session
            .locale_metadata()
            .and_then(|m| m.release_notes_url.as_ref())
            .map(|url| found(field, Source::Parameter, url.clone()))
    }

    /// Release notes from the detector or run parameters, trimmed.
    pub async fn release_notes(&self) -> Option<String> {
        let field = LocaleField::ReleaseNotes;
        if let Some(notes) = self.detected_text(DetectedField::ReleaseNotes).await {
            return Some(found(field, Source::Detected, notes));
        }
        let notes = self.session.locale_metadata()?.release_notes.as_deref()?.trim();
        (!notes.is_empty()).then(|| found(field, Source::Parameter, notes.to_owned()))
    }

    /// The previous value offered as the default for `switch` on the installer being authored.
    ///
    /// The installer is matched by position: the number of installers this run has already
    /// recorded.
    pub fn previous_switch(&self, switch: InstallerSwitch) -> Option<&'run str> {
        let previous: &'run PreviousManifest = self.previous;
        previous.installer_switch(switch, self.session.installer.installers.len())
    }

    fn required(
        &self,
        field: LocaleField,
        session: Option<&str>,
        previous: Option<&str>,
    ) -> Result<String, ResolveError> {
        if let Some(value) = blank_as_absent(session) {
            return Ok(found(field, Source::Session, value.to_owned()));
        }
        match previous {
            Some(value) => Ok(found(field, Source::Previous, value.to_owned())),
            None => {
                tracing::error!(%field, "required field missing after resolution");
                Err(ResolveError::RequiredFieldMissing(field))
            },
        }
    }

    fn text_chain(
        &self,
        field: LocaleField,
        session: Option<&str>,
        previous: Option<&str>,
    ) -> Option<String> {
        if let Some(value) = blank_as_absent(session) {
            return Some(found(field, Source::Session, value.to_owned()));
        }
        previous.map(|value| found(field, Source::Previous, value.to_owned()))
    }

    async fn url_chain(
        &self,
        field: LocaleField,
        session: Option<&Url>,
        previous: Option<&Url>,
        detected: DetectedField,
    ) -> Option<Url> {
        if let Some(url) = session {
            return Some(found(field, Source::Session, url.clone()));
        }
        if let Some(url) = previous {
            return Some(found(field, Source::Previous, url.clone()));
        }
        let url = self.detector?.url(detected).await?;
        Some(found(field, Source::Detected, url.clone()))
    }

    async fn detected_text(&self, field: DetectedField) -> Option<String> {
        self.detector?.text(field).await.map(str::to_owned)
    }
}

//================================================================================================
// Functions
//================================================================================================

fn found<T>(field: LocaleField, source: Source, value: T) -> T {
    tracing::debug!(%field, ?source, "resolved");
    value
}
