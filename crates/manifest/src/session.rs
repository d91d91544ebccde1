//! # Session Context
//!
//! Values entered during the current run. The prompting layer owns a [`Session`] and mutates
//! it between resolutions; the resolver only ever borrows it.
//!
//! Two fields (`license`, `short_description`) distinguish "never touched" from "set to
//! anything, including empty" with [`Required`]. Other optional fields are plain `Option`s,
//! and several of them treat an empty value as if it had never been supplied; see
//! [`blank_as_absent`].

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::id::Locale;
use crate::record::{Identity, Installer, InstallerSwitches, InstallerType};

//================================================================================================
// Types
//================================================================================================

/// A field that is either untouched by the run or explicitly set.
///
/// A `Required` starts out unset and the only mutation offered is [`Required::set`], so once
/// a value is recorded there is no way back to the untouched state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Required<T>(Option<T>);

/// Locale-scoped metadata supplied as run parameters alongside session data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct LocaleMetadata {
    /// The locale this entry applies to.
    pub name: String,
    /// Release notes supplied for the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
    /// Release notes URL supplied for the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes_url: Option<Url>,
}

/// Additional metadata passed in for the run.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AdditionalMetadata {
    /// Per-locale entries, matched case-insensitively against the run's locale.
    #[serde(default)]
    pub locales: Vec<LocaleMetadata>,
}

/// The installer currently being authored plus the ones already recorded.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerSession {
    /// The type of the installer being authored.
    #[serde(default)]
    pub installer_type: Option<InstallerType>,
    /// Installers already completed in this run.
    #[serde(default)]
    pub installers: Vec<Installer>,
    /// Switches accepted so far for the installer being authored.
    #[serde(default)]
    pub switches: InstallerSwitches,
}

/// The values supplied during the current run.
///
/// License and short description can only move forward: they start unset and are recorded
/// through [`Session::set_license`] and [`Session::set_short_description`]. Nothing resets
/// them.
///
/// ```compile_fail
/// # use manifest::session::Session;
/// fn reset(session: &mut Session) {
///     session.license = Default::default();
/// }
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Identifier, version and locale of the package being authored.
    #[serde(flatten)]
    pub identity: Identity,
    /// The publisher name.
    #[serde(default)]
    pub publisher: Option<String>,
    /// The package name.
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    license: Required<String>,
    #[serde(default)]
    short_description: Required<String>,
    /// The package moniker.
    #[serde(default)]
    pub moniker: Option<String>,
    /// The publisher's home page.
    #[serde(default)]
    pub publisher_url: Option<Url>,
    /// The publisher's support page.
    #[serde(default)]
    pub publisher_support_url: Option<Url>,
    /// The privacy policy page.
    #[serde(default)]
    pub privacy_url: Option<Url>,
    /// The package author.
    #[serde(default)]
    pub author: Option<String>,
    /// The package home page.
    #[serde(default)]
    pub package_url: Option<Url>,
    /// The license page.
    #[serde(default)]
    pub license_url: Option<Url>,
    /// The copyright notice.
    #[serde(default)]
    pub copyright: Option<String>,
    /// The copyright page.
    #[serde(default)]
    pub copyright_url: Option<Url>,
    /// Search tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// The long description.
    #[serde(default)]
    pub description: Option<String>,
    /// The release notes page for this version.
    #[serde(default)]
    pub release_notes_url: Option<Url>,
    /// Run parameters keyed by locale.
    #[serde(default)]
    pub additional_metadata: Option<AdditionalMetadata>,
    /// Installer state of the run.
    #[serde(default)]
    pub installer: InstallerSession,
}

//================================================================================================
// Impls
//================================================================================================

impl<T> Required<T> {
    /// Record a value for this field, replacing any earlier one.
    pub fn set(&mut self, value: T) {
        self.0 = Some(value);
    }

    /// Whether the run has supplied a value.
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Borrow the value if one was supplied.
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Required<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(|v| Required(Some(v)))
    }
}

impl Session {
    /// A fresh session with nothing but the run identity.
    pub fn new(identity: Identity) -> Self {
        Session {
            identity,
            publisher: None,
            package_name: None,
            license: Required::default(),
            short_description: Required::default(),
            moniker: None,
            publisher_url: None,
            publisher_support_url: None,
            privacy_url: None,
            author: None,
            package_url: None,
            license_url: None,
            copyright: None,
            copyright_url: None,
            tags: None,
            description: None,
            release_notes_url: None,
            additional_metadata: None,
            installer: InstallerSession::default(),
        }
    }

    /// The license entered in this run.
    pub fn license(&self) -> &Required<String> {
        &self.license
    }

    /// Record the license, possibly empty.
    pub fn set_license(&mut self, license: impl Into<String>) {
        self.license.set(license.into());
    }

    /// The short description entered in this run.
    pub fn short_description(&self) -> &Required<String> {
        &self.short_description
    }

    /// Record the short description, possibly empty.
    pub fn set_short_description(&mut self, description: impl Into<String>) {
        self.short_description.set(description.into());
    }

    /// The parameter metadata entry for the run's locale, if any was supplied.
    pub fn locale_metadata(&self) -> Option<&LocaleMetadata> {
        let locale: &Locale = &self.identity.locale;
        self.additional_metadata
            .as_ref()?
            .locales
            .iter()
            .find(|l| locale.matches(&l.name))
    }
}

//================================================================================================
// Functions
//================================================================================================

/// Treat a blank string the same as an absent one.
pub fn blank_as_absent(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r#"
        identifier = "Foo.Bar"
        version = "1.0.0"
        locale = "en-US"
        license = ""
        publisher = "Foo"

        [additional_metadata]
        Locales = [
            { Name = "EN-us", ReleaseNotes = "Fixes" },
            { Name = "de-DE", ReleaseNotes = "Behebungen" },
        ]

        [installer]
        installer_type = "exe"
    "#;

    #[test]
    fn required_tristate_from_toml() -> anyhow::Result<()> {
        let session: Session = toml_edit::de::from_str(SESSION)?;
        assert_eq!(session.license().get().map(String::as_str), Some(""));
        assert!(!session.short_description().is_set());
        assert_eq!(session.installer.installer_type, Some(InstallerType::Exe));
        Ok(())
    }

    #[test]
    fn set_never_unsets() {
        let mut license = Required::default();
        assert!(!license.is_set());
        license.set("MIT".to_string());
        license.set(String::new());
        assert_eq!(license.get().map(String::as_str), Some(""));
        assert!(license.is_set());
    }

    #[test]
    fn session_license_stays_set() -> anyhow::Result<()> {
        let mut session: Session = toml_edit::de::from_str(SESSION)?;
        assert!(!session.short_description().is_set());
        session.set_short_description("Summary");
        session.set_short_description("");
        assert_eq!(session.short_description().get().map(String::as_str), Some(""));
        session.set_license("MIT");
        assert_eq!(session.license().get().map(String::as_str), Some("MIT"));
        Ok(())
    }

    #[test]
    fn locale_metadata_is_case_insensitive() -> anyhow::Result<()> {
        let session: Session = toml_edit::de::from_str(SESSION)?;
        let meta = session.locale_metadata().map(|m| m.release_notes.as_deref());
        assert_eq!(meta, Some(Some("Fixes")));
        Ok(())
    }

    #[test]
    fn blanks() {
        assert_eq!(blank_as_absent(Some("  ")), None);
        assert_eq!(blank_as_absent(Some("")), None);
        assert_eq!(blank_as_absent(None), None);
        assert_eq!(blank_as_absent(Some("x")), Some("x"));
    }
}
