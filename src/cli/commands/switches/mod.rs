//! This module defines the `switches` subcommand.
//!
//! Shows, for the installer at a given position, which switches it would inherit from the
//! previously published installer manifest and whether each one must be supplied.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use manifest::previous::PreviousManifest;
use manifest::record::InstallerType;
use manifest::validate::switch::{InstallerSwitch, SwitchRequirement};
use serde::Serialize;

//================================================================================================
// Types
//================================================================================================

/// The `switches` subcommand.
#[derive(Parser, Debug)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// The previously published manifests for the same package.
    #[arg(long, value_name = "FILE")]
    previous: PathBuf,
    /// How many installers the current run has already recorded.
    #[arg(long, default_value_t = 0)]
    index: usize,
    /// The type of the installer being authored, e.g. `exe` or `msi`.
    #[arg(long = "installer-type", value_name = "TYPE", value_parser = parse_installer_type)]
    installer_type: Option<InstallerType>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct SwitchReport<'a> {
    switch: String,
    requirement: &'static str,
    inherited: Option<&'a str>,
}

//================================================================================================
// Functions
//================================================================================================

/// The main entry point for the `switches` subcommand.
pub(super) fn run(args: Args) -> Result<()> {
    let previous = super::load_previous(Some(&args.previous))?;
    let report = report(&previous, args.index, args.installer_type);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn report(
    previous: &PreviousManifest,
    index: usize,
    installer_type: Option<InstallerType>,
) -> Vec<SwitchReport<'_>> {
    InstallerSwitch::ALL
        .into_iter()
        .map(|switch| SwitchReport {
            switch: switch.to_string(),
            requirement: match switch.requirement(installer_type) {
                SwitchRequirement::Skip => "skip",
                SwitchRequirement::Optional => "optional",
                SwitchRequirement::Required => "required",
            },
            inherited: previous.installer_switch(switch, index),
        })
        .collect()
}

fn parse_installer_type(s: &str) -> Result<InstallerType> {
    serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
        .with_context(|| format!("unknown installer type '{s}'"))
}
