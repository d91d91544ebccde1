//! # Manifest Records
//!
//! The structured records this crate produces and reads back. A
//! [`DefaultLocaleManifest`] is the output of a resolution run; an [`InstallerManifest`] is
//! only ever read, as part of the previously published snapshot.
//!
//! Records are handed to an external serializer as plain serde values. Keys are PascalCase
//! and absent optional fields are skipped, which matches the published manifest schema:
//!
//! ```toml
//! PackageIdentifier = "Foo.Bar"
//! PackageVersion = "1.2.3"
//! PackageLocale = "en-US"
//! Publisher = "Foo"
//! PackageName = "Bar"
//! License = "MIT"
//! ShortDescription = "A bar for foo"
//! ManifestType = "defaultLocale"
//! ManifestVersion = "1.6.0"
//! ```
//!
//! ## Assembly
//!
//! [`DefaultLocaleManifest::assemble`] is the only constructor used by the resolver. It
//! combines the run identity, the resolved [`LocaleFields`] and a [`Stamp`], inheriting the
//! fields this engine does not resolve from the previous snapshot when one exists.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::id::{Locale, PackageIdentifier, PackageVersion};

/// The schema version stamped when no override is configured.
pub const MANIFEST_VERSION: &str = "1.6.0";

//================================================================================================
// Types
//================================================================================================

/// The kind of manifest a record represents.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ManifestType {
    /// The default locale manifest.
    DefaultLocale,
    /// An additional locale manifest.
    Locale,
    /// The installer manifest.
    Installer,
    /// The version manifest.
    Version,
}

/// Fixed metadata written into every produced record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    manifest_version: String,
}

/// The identifiers fixed for a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The package identifier.
    pub identifier: PackageIdentifier,
    /// The package version being authored.
    pub version: PackageVersion,
    /// The default locale of the package.
    pub locale: Locale,
}

/// Every content field of a default locale manifest after precedence resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocaleFields {
    /// The publisher name.
    pub publisher: String,
    /// The publisher's home page.
    pub publisher_url: Option<Url>,
    /// The publisher's support page.
    pub publisher_support_url: Option<Url>,
    /// The privacy policy page.
    pub privacy_url: Option<Url>,
    /// The package author.
    pub author: Option<String>,
    /// The package name.
    pub package_name: String,
    /// The package home page.
    pub package_url: Option<Url>,
    /// The license, empty when unknown.
    pub license: String,
    /// The license page.
    pub license_url: Option<Url>,
    /// The copyright notice.
    pub copyright: Option<String>,
    /// The copyright page.
    pub copyright_url: Option<Url>,
    /// A one-line summary, empty when unknown.
    pub short_description: String,
    /// The long description, one sentence per line.
    pub description: Option<String>,
    /// The common short name of the package.
    pub moniker: Option<String>,
    /// Search tags.
    pub tags: Option<Vec<String>>,
    /// Release notes for this version.
    pub release_notes: Option<String>,
    /// The release notes page for this version.
    pub release_notes_url: Option<Url>,
}

/// The default locale manifest record.
///
/// Produced once per run by [`DefaultLocaleManifest::assemble`]; the engine never mutates a
/// record after handing it out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultLocaleManifest {
    /// The package identifier.
    pub package_identifier: PackageIdentifier,
    /// The package version.
    pub package_version: PackageVersion,
    /// The locale of this manifest.
    pub package_locale: Locale,
    /// The publisher name.
    pub publisher: String,
    /// The publisher's home page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_url: Option<Url>,
    /// The publisher's support page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_support_url: Option<Url>,
    /// The privacy policy page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_url: Option<Url>,
    /// The package author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// The package name.
    pub package_name: String,
    /// The package home page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_url: Option<Url>,
    /// The license, empty when unknown.
    pub license: String,
    /// The license page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_url: Option<Url>,
    /// The copyright notice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// The copyright page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_url: Option<Url>,
    /// A one-line summary, empty when unknown.
    pub short_description: String,
    /// The long description, one sentence per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The common short name of the package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moniker: Option<String>,
    /// Search tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Release notes for this version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
    /// The release notes page for this version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes_url: Option<Url>,
    /// The purchase page, carried over from the previous version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_url: Option<Url>,
    /// Notes shown after installation, carried over from the previous version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_notes: Option<String>,
    /// The kind of manifest.
    pub manifest_type: ManifestType,
    /// The manifest schema version.
    pub manifest_version: String,
}

/// The installer technology a package ships with.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InstallerType {
    /// An MSIX package.
    Msix,
    /// A Windows Installer package.
    Msi,
    /// An APPX package.
    Appx,
    /// A plain executable installer.
    Exe,
    /// A zip archive.
    Zip,
    /// An Inno Setup installer.
    Inno,
    /// A Nullsoft (NSIS) installer.
    Nullsoft,
    /// A WiX-built MSI.
    Wix,
    /// A WiX Burn bundle.
    Burn,
    /// A progressive web app.
    Pwa,
    /// A portable executable.
    Portable,
    /// A font package.
    Font,
}

/// Switches passed to an installer.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct InstallerSwitches {
    /// Switches for a fully silent install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent: Option<String>,
    /// Switches for a non-interactive install that shows progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent_with_progress: Option<String>,
    /// Extra switches passed on every install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
}

/// A single installer entry.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Installer {
    /// The target architecture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    /// The installer technology.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_type: Option<InstallerType>,
    /// Where the installer is downloaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_url: Option<Url>,
    /// Switches passed to the installer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_switches: Option<InstallerSwitches>,
}

/// The installer manifest, holding manifest-wide defaults and per-installer overrides.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct InstallerManifest {
    /// The package identifier.
    pub package_identifier: PackageIdentifier,
    /// The package version.
    pub package_version: PackageVersion,
    /// The installer technology.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_type: Option<InstallerType>,
    /// Switches passed to the installer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_switches: Option<InstallerSwitches>,
    /// Per-installer entries, in recording order.
    #[serde(default)]
    pub installers: Vec<Installer>,
    /// The kind of manifest.
    pub manifest_type: ManifestType,
    /// The manifest schema version.
    pub manifest_version: String,
}

//================================================================================================
// Impls
//================================================================================================

impl Stamp {
    /// Stamp with the configured schema version, or [`MANIFEST_VERSION`] without one.
    pub fn new(version_override: Option<&str>) -> Self {
        Stamp {
            manifest_version: version_override.unwrap_or(MANIFEST_VERSION).to_owned(),
        }
    }

    /// The schema version this stamp writes.
    pub fn manifest_version(&self) -> &str {
        &self.manifest_version
    }
}

impl Default for Stamp {
    fn default() -> Self {
        Stamp::new(None)
    }
}

impl DefaultLocaleManifest {
    /// Combine resolved fields into the final record.
    ///
    /// Fields outside [`LocaleFields`] are inherited from `base` when a previous snapshot
    /// exists; everything else is taken from `fields` as resolved, so an absent field in
    /// `fields` stays absent even if `base` had it.
    pub fn assemble(
        base: Option<&DefaultLocaleManifest>,
        identity: &Identity,
        fields: LocaleFields,
        stamp: &Stamp,
    ) -> Self {
        let LocaleFields {
            publisher,
            publisher_url,
            publisher_support_url,
            privacy_url,
            author,
            package_name,
            package_url,
            license,
            license_url,
            copyright,
            copyright_url,
            short_description,
            description,
            moniker,
            tags,
            release_notes,
            release_notes_url,
        } = fields;

        DefaultLocaleManifest {
            package_identifier: identity.identifier.clone(),
            package_version: identity.version.clone(),
            package_locale: identity.locale.clone(),
            publisher,
            publisher_url,
            publisher_support_url,
            privacy_url,
            author,
            package_name,
            package_url,
            license,
            license_url,
            copyright,
            copyright_url,
            short_description,
            description,
            moniker,
            tags,
            release_notes,
            release_notes_url,
            purchase_url: base.and_then(|b| b.purchase_url.clone()),
            installation_notes: base.and_then(|b| b.installation_notes.clone()),
            manifest_type: ManifestType::DefaultLocale,
            manifest_version: stamp.manifest_version.clone(),
        }
    }
}

impl InstallerSwitches {
    /// Whether no switch is set.
    pub fn is_empty(&self) -> bool {
        self.silent.is_none() && self.silent_with_progress.is_none() && self.custom.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> anyhow::Result<Identity> {
        Ok(Identity {
            identifier: "Foo.Bar".parse()?,
            version: "1.2.3".parse()?,
            locale: "en-US".parse()?,
        })
    }

    #[test]
    fn assemble_stamps_and_inherits() -> anyhow::Result<()> {
        let identity = identity()?;
        let previous = DefaultLocaleManifest {
            purchase_url: Some(Url::parse("https://foo.example/buy")?),
            installation_notes: Some("Restart afterwards".into()),
            author: Some("Old Author".into()),
            ..DefaultLocaleManifest::assemble(
                None,
                &identity,
                LocaleFields::default(),
                &Stamp::default(),
            )
        };
        let fields = LocaleFields {
            publisher: "Foo".into(),
            package_name: "Bar".into(),
            license: "MIT".into(),
            short_description: "A bar".into(),
            ..Default::default()
        };

        let record =
            DefaultLocaleManifest::assemble(Some(&previous), &identity, fields, &Stamp::new(Some("1.5.0")));

        assert_eq!(record.manifest_type, ManifestType::DefaultLocale);
        assert_eq!(record.manifest_version, "1.5.0");
        assert_eq!(record.installation_notes.as_deref(), Some("Restart afterwards"));
        assert!(record.purchase_url.is_some());
        // resolved fields win even when absent
        assert_eq!(record.author, None);
        assert_eq!(record.publisher, "Foo");
        Ok(())
    }

    #[test]
    fn serialized_keys() -> anyhow::Result<()> {
        let fields = LocaleFields {
            publisher: "Foo".into(),
            package_name: "Bar".into(),
            license: "MIT".into(),
            short_description: "A bar".into(),
            privacy_url: Some(Url::parse("https://foo.example/privacy")?),
            ..Default::default()
        };
        let record = DefaultLocaleManifest::assemble(None, &identity()?, fields, &Stamp::default());
        let value = serde_json::to_value(&record)?;

        assert_eq!(value["ManifestType"], "defaultLocale");
        assert_eq!(value["ManifestVersion"], MANIFEST_VERSION);
        assert_eq!(value["PrivacyUrl"], "https://foo.example/privacy");
        assert!(value.get("Author").is_none());
        assert!(value.get("Tags").is_none());

        let back: DefaultLocaleManifest = serde_json::from_value(value)?;
        assert_eq!(back, record);
        Ok(())
    }
}
