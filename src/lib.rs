//! Forge, a manifest authoring tool that reconciles session input, the previously published
//! manifest and values detected from the package's hosting platform.

#![warn(missing_docs)]

pub mod cli;
