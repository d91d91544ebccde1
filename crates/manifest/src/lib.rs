//! # Manifest Crate
//!
//! The `manifest` crate produces a package's default locale manifest by reconciling three
//! competing sources of truth: values entered in the current session, the previously
//! published version of the same manifest, and values detected from the package's
//! source-hosting platform.
//!
//! ## Key Concepts
//!
//! **Precedence** decides, field by field, which source wins. The session comes first, then
//! the previous snapshot, then detection, then a field default. A handful of fields refine
//! that order; see [`resolve`].
//!
//! **Detection** is lazy and best effort. Every detectable field is an independent,
//! at-most-once probe whose failure is indistinguishable from "nothing found".
//!
//! **Validation** happens before a value enters the session, against length boundaries
//! declared by the manifest schema. Values taken from the previous snapshot or from detection
//! are trusted as already valid.
//!
//! ## Architecture
//!
//! - [`id`] - Validated package identifier, version and locale.
//! - [`session`] - The values supplied during the current run.
//! - [`previous`] - The previously published snapshot and installer switch fallback.
//! - [`detect`] - Lazily resolved, cached detection over a pluggable [`Probe`].
//! - [`validate`] - Schema-boundary validation of candidate input.
//! - [`resolve`] - The precedence engine.
//! - [`record`] - The produced and consumed manifest records.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use manifest::detect::{DetectedField, Detector, StaticProbe};
//! use manifest::previous::PreviousManifest;
//! use manifest::record::Identity;
//! use manifest::resolve::Resolver;
//! use manifest::session::Session;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = Identity {
//!     identifier: "Foo.Bar".parse()?,
//!     version: "1.0.0".parse()?,
//!     locale: "en-US".parse()?,
//! };
//! let mut session = Session::new(identity);
//! session.publisher = Some("Foo".into());
//! session.package_name = Some("Bar".into());
//!
//! let previous = PreviousManifest::none();
//! let detector = Detector::new(StaticProbe::default().with(DetectedField::License, "MIT"));
//!
//! let record = Resolver::new(&session, &previous, Some(&detector))
//!     .resolve_all()
//!     .await?;
//! assert_eq!(record.license, "MIT");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub use self::detect::{Detector, Probe};
pub use self::record::DefaultLocaleManifest;
pub use self::previous::PreviousManifest;
pub use self::resolve::Resolver;
pub use self::session::Session;
pub use self::validate::{Boundaries, FieldCategory, ValidationError};

pub mod detect;
pub mod id;
pub mod log;
pub mod previous;
pub mod record;
pub mod resolve;
pub mod session;
pub mod validate;
