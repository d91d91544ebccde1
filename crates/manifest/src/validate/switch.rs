//! Installer switch acceptance.
//!
//! Whether a switch is prompted for, and whether it may be left blank, depends on the
//! installer type: an `exe` installer must declare its silent switches, while the custom
//! switch is always optional and offered for every installer type.

use std::fmt;

use super::{Boundaries, FieldCategory, ValidationError};
use crate::record::{InstallerSwitches, InstallerType};

//================================================================================================
// Types
//================================================================================================

/// One of the switches an installer can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallerSwitch {
    /// Fully silent install.
    Silent,
    /// Non-interactive install that shows progress.
    SilentWithProgress,
    /// Extra switches passed on every install.
    Custom,
}

/// How a switch is collected for the installer being authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchRequirement {
    /// The switch does not apply to this installer type.
    Skip,
    /// The switch may be left blank.
    Optional,
    /// The switch must be supplied.
    Required,
}

//================================================================================================
// Impls
//================================================================================================

impl InstallerSwitch {
    /// Every switch, in prompting order.
    pub const ALL: [InstallerSwitch; 3] = [
        InstallerSwitch::Silent,
        InstallerSwitch::SilentWithProgress,
        InstallerSwitch::Custom,
    ];

    /// The validation category for this switch.
    pub fn category(self) -> FieldCategory {
        match self {
            InstallerSwitch::Silent => FieldCategory::SilentSwitch,
            InstallerSwitch::SilentWithProgress => FieldCategory::SilentWithProgressSwitch,
            InstallerSwitch::Custom => FieldCategory::CustomSwitch,
        }
    }

    /// Typical values, shown to whoever is entering the switch.
    pub fn example(self) -> &'static str {
        match self {
            InstallerSwitch::Silent => "/S, -verysilent, /qn, --silent, /exenoui",
            InstallerSwitch::SilentWithProgress => "/S, -silent, /qb, /exebasicui",
            InstallerSwitch::Custom => "/norestart, -norestart",
        }
    }

    /// Decide how this switch is collected for `installer_type`.
    pub fn requirement(self, installer_type: Option<InstallerType>) -> SwitchRequirement {
        let exe = installer_type == Some(InstallerType::Exe);
        match self {
            InstallerSwitch::Custom => SwitchRequirement::Optional,
            _ if exe => SwitchRequirement::Required,
            _ => SwitchRequirement::Skip,
        }
    }
}

impl fmt::Display for InstallerSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InstallerSwitch::Silent => "Silent",
            InstallerSwitch::SilentWithProgress => "Silent with progress",
            InstallerSwitch::Custom => "Custom",
        })
    }
}

impl std::str::FromStr for InstallerSwitch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "silent" => Ok(InstallerSwitch::Silent),
            "silentwithprogress" => Ok(InstallerSwitch::SilentWithProgress),
            "custom" => Ok(InstallerSwitch::Custom),
            _ => Err(format!("unknown installer switch: {s}")),
        }
    }
}

impl SwitchRequirement {
    /// Whether a blank candidate is acceptable.
    pub fn allow_blank(self) -> bool {
        self != SwitchRequirement::Required
    }
}

impl InstallerSwitches {
    /// The value recorded for `switch`.
    pub fn get(&self, switch: InstallerSwitch) -> Option<&str> {
        match switch {
            InstallerSwitch::Silent => self.silent.as_deref(),
            InstallerSwitch::SilentWithProgress => self.silent_with_progress.as_deref(),
            InstallerSwitch::Custom => self.custom.as_deref(),
        }
    }

    /// Record `value` for `switch`.
    pub fn set(&mut self, switch: InstallerSwitch, value: Option<String>) {
        let slot = match switch {
            InstallerSwitch::Silent => &mut self.silent,
            InstallerSwitch::SilentWithProgress => &mut self.silent_with_progress,
            InstallerSwitch::Custom => &mut self.custom,
        };
        *slot = value;
    }
}

impl Boundaries {
    /// Validate a switch candidate, mapping an accepted blank to no switch at all.
    ///
    /// # Errors
    ///
    /// Propagates [`ValidationError`] from [`Boundaries::validate`].
    pub fn accept_switch(
        &self,
        candidate: &str,
        switch: InstallerSwitch,
        requirement: SwitchRequirement,
    ) -> Result<Option<String>, ValidationError> {
        let accepted = self.validate(candidate, switch.category(), requirement.allow_blank())?;
        Ok(Some(accepted).filter(|s| !s.is_empty()))
    }
}
