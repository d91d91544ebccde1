//! # Previous-Version Provider
//!
//! The most recently published manifests for the same package and locale. A snapshot is
//! fetched once by the caller and then only read; [`PreviousManifest::none`] stands in for
//! first-time authoring.
//!
//! Installer switches fall back in two levels: the override on the installer at the same
//! position as the one being authored, then the manifest-wide value. The position is the
//! number of installers the current run has already recorded, so the next installer
//! inherits from the next not-yet-consumed previous installer.

use crate::record::{DefaultLocaleManifest, InstallerManifest, InstallerSwitches};
use crate::validate::switch::InstallerSwitch;

//================================================================================================
// Types
//================================================================================================

/// The last published state for the run's package, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousManifest {
    default_locale: Option<DefaultLocaleManifest>,
    installer: Option<InstallerManifest>,
}

//================================================================================================
// Impls
//================================================================================================

impl PreviousManifest {
    /// A snapshot from previously published manifests.
    pub fn new(
        default_locale: Option<DefaultLocaleManifest>,
        installer: Option<InstallerManifest>,
    ) -> Self {
        PreviousManifest {
            default_locale,
            installer,
        }
    }

    /// No previous version exists.
    pub fn none() -> Self {
        PreviousManifest::default()
    }

    /// The previous default locale manifest.
    pub fn default_locale(&self) -> Option<&DefaultLocaleManifest> {
        self.default_locale.as_ref()
    }

    /// The previous installer manifest.
    pub fn installer(&self) -> Option<&InstallerManifest> {
        self.installer.as_ref()
    }

    /// Look up a single value of the previous default locale manifest.
    pub fn locale_value<'a, T: ?Sized>(
        &'a self,
        field: impl FnOnce(&'a DefaultLocaleManifest) -> Option<&'a T>,
    ) -> Option<&'a T> {
        self.default_locale.as_ref().and_then(field)
    }

    /// The previous value of `switch` for the installer at `installer_index`.
    ///
    /// An index past the end of the previous installers is a miss at the per-installer
    /// level, not an error.
    pub fn installer_switch(&self, switch: InstallerSwitch, installer_index: usize) -> Option<&str> {
        let manifest = self.installer.as_ref()?;
        manifest
            .installers
            .get(installer_index)
            .and_then(|i| i.installer_switches.as_ref())
            .and_then(|s| s.get(switch))
            .or_else(|| manifest.installer_switches.as_ref()?.get(switch))
    }

    /// All previous switches for the installer at `installer_index`, merged per switch.
    pub fn installer_switches(&self, installer_index: usize) -> InstallerSwitches {
        let mut switches = InstallerSwitches::default();
        for switch in InstallerSwitch::ALL {
            switches.set(
                switch,
                self.installer_switch(switch, installer_index).map(str::to_owned),
            );
        }
        switches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Installer, ManifestType};

    fn switches(silent: Option<&str>, custom: Option<&str>) -> Option<InstallerSwitches> {
        Some(InstallerSwitches {
            silent: silent.map(Into::into),
            silent_with_progress: None,
            custom: custom.map(Into::into),
        })
    }

    fn installer_manifest(
        shared: Option<InstallerSwitches>,
        installers: Vec<Option<InstallerSwitches>>,
    ) -> anyhow::Result<InstallerManifest> {
        Ok(InstallerManifest {
            package_identifier: "Foo.Bar".parse()?,
            package_version: "1.0.0".parse()?,
            installer_type: None,
            installer_switches: shared,
            installers: installers
                .into_iter()
                .map(|installer_switches| Installer {
                    installer_switches,
                    ..Default::default()
                })
                .collect(),
            manifest_type: ManifestType::Installer,
            manifest_version: "1.6.0".into(),
        })
    }

    #[test]
    fn manifest_wide_fallback_past_the_end() -> anyhow::Result<()> {
        let manifest = installer_manifest(switches(Some("/S"), None), vec![None])?;
        let previous = PreviousManifest::new(None, Some(manifest));

        assert_eq!(previous.installer_switch(InstallerSwitch::Silent, 1), Some("/S"));
        assert_eq!(previous.installer_switch(InstallerSwitch::Custom, 1), None);
        Ok(())
    }

    #[test]
    fn next_unconsumed_installer_wins() -> anyhow::Result<()> {
        let manifest = installer_manifest(
            switches(Some("/shared"), Some("/norestart")),
            vec![switches(Some("/first"), None), switches(Some("/second"), None)],
        )?;
        let previous = PreviousManifest::new(None, Some(manifest));

        assert_eq!(previous.installer_switch(InstallerSwitch::Silent, 0), Some("/first"));
        assert_eq!(previous.installer_switch(InstallerSwitch::Silent, 1), Some("/second"));
        assert_eq!(previous.installer_switch(InstallerSwitch::Silent, 2), Some("/shared"));
        assert_eq!(
            previous.installer_switch(InstallerSwitch::Custom, 1),
            Some("/norestart")
        );

        let merged = previous.installer_switches(1);
        assert_eq!(merged.silent.as_deref(), Some("/second"));
        assert_eq!(merged.silent_with_progress, None);
        assert_eq!(merged.custom.as_deref(), Some("/norestart"));
        Ok(())
    }

    #[test]
    fn absent_snapshot() {
        let previous = PreviousManifest::none();
        assert!(previous.default_locale().is_none());
        assert_eq!(previous.installer_switch(InstallerSwitch::Silent, 0), None);
        assert!(previous.installer_switches(3).is_empty());
    }
}
