//! This module defines the `validate` subcommand.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use manifest::FieldCategory;

/// The `validate` subcommand.
#[derive(Parser, Debug)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// The field the value is destined for, e.g. `publisher` or `silent-switch`.
    category: FieldCategory,
    /// The candidate value.
    value: String,
    /// Accept a blank value.
    #[arg(long)]
    allow_blank: bool,
    /// A JSON schema whose length boundaries override the built-in ones.
    #[arg(long, value_name = "FILE")]
    schema: Vec<PathBuf>,
}

/// The main entry point for the `validate` subcommand.
pub(super) fn run(args: Args) -> Result<()> {
    let boundaries = super::load_boundaries(&args.schema)?;
    let accepted = boundaries.validate(&args.value, args.category, args.allow_blank)?;
    tracing::debug!(category = %args.category, bound = ?boundaries.get(args.category), "accepted");
    println!("{accepted}");
    Ok(())
}
