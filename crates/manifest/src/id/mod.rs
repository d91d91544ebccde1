//! # Package Identification Constructs
//!
//! The triple that names a manifest for the whole run: the package identifier, the package
//! version and the locale. All three are fixed before any field is resolved, and each is
//! validated on construction so the rest of the crate never has to re-check them.
//!
//! ## Validation Rules
//!
//! Package identifiers must:
//! - Consist of 2 to 8 segments separated by `.`
//! - Keep each segment between 1 and 32 characters
//! - Not contain whitespace, control characters, or any of `\ / : * ? " < > |`
//! - Not exceed 128 characters in total
//!
//! Package versions may be any non-blank string of at most 128 characters that avoids the
//! same reserved path characters. Locales follow the BCP-47 shape used by the manifest schema
//! (`en`, `en-US`, `zh-Hans-CN`) and are at most 20 characters long.
//!
//! ## Usage Example
//!
//! ```rust
//! use manifest::id::{Locale, PackageIdentifier};
//!
//! let id = PackageIdentifier::try_from("Microsoft.PowerToys").unwrap();
//! assert_eq!(id.publisher_segment(), "Microsoft");
//!
//! let locale: Locale = "en-US".parse().unwrap();
//! assert!(locale.matches("EN-us"));
//! ```
#[cfg(test)]
mod tests;

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use lazy_regex::{Lazy, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const IDENTIFIER_MAX: usize = 128;
const VERSION_MAX: usize = 128;
const LOCALE_MAX: usize = 20;

//================================================================================================
// Statics
//================================================================================================

static IDENTIFIER_REGEX: Lazy<Regex> = lazy_regex::lazy_regex!(
    r#"^[^.\s\\/:*?"<>|\x01-\x1f]{1,32}(\.[^.\s\\/:*?"<>|\x01-\x1f]{1,32}){1,7}$"#
);

static VERSION_REGEX: Lazy<Regex> = lazy_regex::lazy_regex!(r#"^[^\\/:*?"<>|\x01-\x1f]+$"#);

static LOCALE_REGEX: Lazy<Regex> =
    lazy_regex::lazy_regex!(r#"^([a-zA-Z]{2,3}|[ix]-[a-zA-Z]{1,8})(-[a-zA-Z0-9]{1,8})*$"#);

//================================================================================================
// Types
//================================================================================================

/// Errors raised when an identifier fails validation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The value exceeds the maximum length for its kind.
    #[error("a {kind} cannot be more than {max} characters")]
    TooLong {
        /// The kind of identifier being validated.
        kind: &'static str,
        /// The maximum number of characters allowed.
        max: usize,
    },
    /// The value is empty or whitespace only.
    #[error("a {0} cannot be empty")]
    Empty(&'static str),
    /// The value does not have the expected shape.
    #[error("'{value}' is not a valid {kind}")]
    Malformed {
        /// The kind of identifier being validated.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// A vetted package identifier such as `Publisher.Package`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageIdentifier(String);

/// A vetted package version string.
///
/// Versions are compared as opaque strings here; ordering semantics belong to the
/// publishing side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageVersion(String);

/// A vetted BCP-47 style locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

/// Shared validation contract for the identifier newtypes.
trait Vetted {
    const KIND: &'static str;
    const MAX: usize;

    fn pattern() -> &'static Regex;

    fn validate(s: &str) -> Result<(), Error> {
        if s.trim().is_empty() {
            return Err(Error::Empty(Self::KIND));
        }
        if s.chars().count() > Self::MAX {
            return Err(Error::TooLong {
                kind: Self::KIND,
                max: Self::MAX,
            });
        }
        if !Self::pattern().is_match(s) {
            return Err(Error::Malformed {
                kind: Self::KIND,
                value: s.to_owned(),
            });
        }
        Ok(())
    }
}

//================================================================================================
// Macros
//================================================================================================

macro_rules! vetted_string {
    ($ty:ident, $kind:literal, $max:expr, $regex:expr) => {
        impl Vetted for $ty {
            const KIND: &'static str = $kind;
            const MAX: usize = $max;

            fn pattern() -> &'static Regex {
                &$regex
            }
        }

        impl Deref for $ty {
            type Target = String;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Vetted>::validate(s)?;
                Ok($ty(s.to_owned()))
            }
        }

        impl TryFrom<String> for $ty {
            type Error = Error;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                <$ty as Vetted>::validate(&s)?;
                Ok($ty(s))
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = Error;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                $ty::from_str(s)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    };
}

vetted_string!(
    PackageIdentifier,
    "package identifier",
    IDENTIFIER_MAX,
    IDENTIFIER_REGEX
);
vetted_string!(PackageVersion, "package version", VERSION_MAX, VERSION_REGEX);
vetted_string!(Locale, "locale", LOCALE_MAX, LOCALE_REGEX);

//================================================================================================
// Impls
//================================================================================================

impl PackageIdentifier {
    /// The leading segment, conventionally the publisher.
    pub fn publisher_segment(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }
}

impl Locale {
    /// Case-insensitive comparison against a raw locale tag.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}
