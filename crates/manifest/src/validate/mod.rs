//! # Constraint Validation
//!
//! Checks a raw candidate string against the length boundary the manifest schema declares
//! for its [`FieldCategory`]. Validation is stateless: the caller decides whether blank is
//! currently permitted, this module only enforces it.
//!
//! Checks run in order and stop at the first failure:
//! 1. blank input when blank is not allowed yields [`ValidationError::BlankInput`]
//! 2. input longer than the category maximum yields [`ValidationError::InvalidLength`]
//! 3. anything else is accepted, trimmed
//!
//! Boundaries default to the published schema constants and can be re-derived from a loaded
//! schema document with [`Boundaries::from_schema`].

pub mod switch;
#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

//================================================================================================
// Types
//================================================================================================

/// A rejected candidate, carrying what the prompting layer needs for a retry message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required value was empty or whitespace only.
    #[error("{label} cannot be blank")]
    BlankInput {
        /// The prompt label of the field.
        label: &'static str,
    },
    /// The value does not fit the schema boundary.
    #[error("Invalid length: must be between {min} and {max} characters")]
    InvalidLength {
        /// The schema minimum for the field.
        min: usize,
        /// The schema maximum for the field.
        max: usize,
    },
}

/// The class of field a candidate belongs to; each has its own boundary and prompt label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    /// Publisher name.
    Publisher,
    /// Package name.
    PackageName,
    /// License identifier.
    License,
    /// One-line summary.
    ShortDescription,
    /// Long description.
    Description,
    /// Package author.
    Author,
    /// Copyright notice.
    Copyright,
    /// Package moniker.
    Moniker,
    /// A single search tag.
    Tag,
    /// Release notes text.
    ReleaseNotes,
    /// Post-install notes.
    InstallationNotes,
    /// Any URL field.
    Url,
    /// Silent installer switch.
    SilentSwitch,
    /// Silent-with-progress installer switch.
    SilentWithProgressSwitch,
    /// Custom installer switch.
    CustomSwitch,
}

/// Inclusive length limits, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    /// Fewest characters allowed.
    pub min: usize,
    /// Most characters allowed.
    pub max: usize,
}

/// The boundaries in force for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boundaries {
    overrides: HashMap<FieldCategory, Boundary>,
}

//================================================================================================
// Impls
//================================================================================================

impl FieldCategory {
    /// Every category, in declaration order.
    pub const ALL: [FieldCategory; 15] = [
        FieldCategory::Publisher,
        FieldCategory::PackageName,
        FieldCategory::License,
        FieldCategory::ShortDescription,
        FieldCategory::Description,
        FieldCategory::Author,
        FieldCategory::Copyright,
        FieldCategory::Moniker,
        FieldCategory::Tag,
        FieldCategory::ReleaseNotes,
        FieldCategory::InstallationNotes,
        FieldCategory::Url,
        FieldCategory::SilentSwitch,
        FieldCategory::SilentWithProgressSwitch,
        FieldCategory::CustomSwitch,
    ];

    /// The human-facing prompt label.
    pub fn label(self) -> &'static str {
        match self {
            FieldCategory::Publisher => "Publisher",
            FieldCategory::PackageName => "Package name",
            FieldCategory::License => "License",
            FieldCategory::ShortDescription => "Short description",
            FieldCategory::Description => "Description",
            FieldCategory::Author => "Author",
            FieldCategory::Copyright => "Copyright",
            FieldCategory::Moniker => "Moniker",
            FieldCategory::Tag => "Tag",
            FieldCategory::ReleaseNotes => "Release notes",
            FieldCategory::InstallationNotes => "Installation notes",
            FieldCategory::Url => "Url",
            FieldCategory::SilentSwitch => "Silent switch",
            FieldCategory::SilentWithProgressSwitch => "Silent with progress switch",
            FieldCategory::CustomSwitch => "Custom switch",
        }
    }

    /// The boundary published in the manifest schema.
    pub fn default_boundary(self) -> Boundary {
        let (min, max) = match self {
            FieldCategory::Publisher | FieldCategory::PackageName | FieldCategory::Author => {
                (2, 256)
            },
            FieldCategory::License | FieldCategory::Copyright => (3, 512),
            FieldCategory::ShortDescription => (3, 256),
            FieldCategory::Description => (3, 10000),
            FieldCategory::Moniker | FieldCategory::Tag => (1, 40),
            FieldCategory::ReleaseNotes | FieldCategory::InstallationNotes => (1, 10000),
            FieldCategory::Url => (1, 2048),
            FieldCategory::SilentSwitch | FieldCategory::SilentWithProgressSwitch => (1, 512),
            FieldCategory::CustomSwitch => (1, 2048),
        };
        Boundary { min, max }
    }

    /// Where the category's definition lives in its schema document.
    fn schema_pointer(self) -> &'static str {
        match self {
            FieldCategory::Publisher => "/properties/Publisher",
            FieldCategory::PackageName => "/properties/PackageName",
            FieldCategory::License => "/properties/License",
            FieldCategory::ShortDescription => "/properties/ShortDescription",
            FieldCategory::Description => "/properties/Description",
            FieldCategory::Author => "/properties/Author",
            FieldCategory::Copyright => "/properties/Copyright",
            FieldCategory::Moniker => "/properties/Moniker",
            FieldCategory::Tag => "/definitions/Tag",
            FieldCategory::ReleaseNotes => "/properties/ReleaseNotes",
            FieldCategory::InstallationNotes => "/properties/InstallationNotes",
            FieldCategory::Url => "/definitions/Url",
            FieldCategory::SilentSwitch => "/definitions/InstallerSwitches/properties/Silent",
            FieldCategory::SilentWithProgressSwitch => {
                "/definitions/InstallerSwitches/properties/SilentWithProgress"
            },
            FieldCategory::CustomSwitch => "/definitions/InstallerSwitches/properties/Custom",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for FieldCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalize = |s: &str| -> String {
            s.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        };
        let key = normalize(s);
        FieldCategory::ALL
            .into_iter()
            .find(|c| normalize(c.label()) == key || normalize(&format!("{c:?}")) == key)
            .ok_or_else(|| format!("unknown field category: {s}"))
    }
}

impl Boundaries {
    /// Derive boundaries from a schema document.
    ///
    /// Each category's definition is looked up by pointer, following a single local `$ref`
    /// when the definition is a reference. Categories missing from the document keep their
    /// published defaults, as does either limit that the definition leaves out.
    pub fn from_schema(schema: &Value) -> Self {
        let overrides = FieldCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let node = schema.pointer(category.schema_pointer())?;
                let node = match node.get("$ref").and_then(Value::as_str) {
                    Some(r) => schema.pointer(r.strip_prefix('#')?)?,
                    None => node,
                };
                let default = category.default_boundary();
                let limit = |key: &str| {
                    node.get(key)
                        .and_then(Value::as_u64)
                        .and_then(|n| usize::try_from(n).ok())
                };
                let (min, max) = (limit("minLength"), limit("maxLength"));
                if min.is_none() && max.is_none() {
                    return None;
                }
                Some((category, Boundary {
                    min: min.unwrap_or(default.min),
                    max: max.unwrap_or(default.max),
                }))
            })
            .collect();
        Boundaries { overrides }
    }

    /// Layer another document's boundaries over these ones.
    pub fn merge(mut self, other: Boundaries) -> Self {
        self.overrides.extend(other.overrides);
        self
    }

    /// The boundary in force for `category`.
    pub fn get(&self, category: FieldCategory) -> Boundary {
        self.overrides
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_boundary())
    }

    /// Check `candidate` for `category`, returning the trimmed value on success.
    ///
    /// # Errors
    ///
    /// [`ValidationError::BlankInput`] when `candidate` is blank and `allow_blank` is false,
    /// otherwise [`ValidationError::InvalidLength`] when it exceeds the category maximum.
    pub fn validate(
        &self,
        candidate: &str,
        category: FieldCategory,
        allow_blank: bool,
    ) -> Result<String, ValidationError> {
        let Boundary { min, max } = self.get(category);
        if candidate.trim().is_empty() && !allow_blank {
            return Err(ValidationError::BlankInput {
                label: category.label(),
            });
        }
        if candidate.chars().count() > max {
            return Err(ValidationError::InvalidLength { min, max });
        }
        Ok(candidate.trim().to_owned())
    }
}
