//! This module defines the `resolve` subcommand.
//!
//! The `resolve` subcommand validates a session file, reconciles it with the previously
//! published manifest and detected values, and prints the resulting default locale manifest.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use manifest::detect::{Detector, GitHubReleaseProbe, StaticProbe};
use manifest::record::Stamp;
use manifest::{Boundaries, FieldCategory, Resolver, Session};
use url::Url;

//================================================================================================
// Types
//================================================================================================

type Probes = (Option<StaticProbe>, Option<GitHubReleaseProbe>);

/// The `resolve` subcommand.
#[derive(Parser, Debug)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// The session file holding the values entered for this run.
    #[arg(long, value_name = "FILE")]
    session: PathBuf,
    /// The previously published manifests for the same package.
    #[arg(long, value_name = "FILE")]
    previous: Option<PathBuf>,
    /// A table of detected values, keyed by field.
    #[arg(long, value_name = "FILE")]
    detected: Option<PathBuf>,
    /// A GitHub release asset URL to derive hosting URLs from.
    #[arg(long, value_name = "URL")]
    release_url: Option<Url>,
    /// A JSON schema whose length boundaries override the built-in ones.
    ///
    /// May be given more than once; later schemas take precedence.
    #[arg(long, value_name = "FILE")]
    schema: Vec<PathBuf>,
    /// Resolve without consulting any detected values.
    #[arg(long)]
    no_detect: bool,
}

//================================================================================================
// Functions
//================================================================================================

/// The main entry point for the `resolve` subcommand.
pub(super) async fn run(args: Args) -> Result<()> {
    let mut session: Session = super::read_toml(&args.session)?;
    let boundaries = super::load_boundaries(&args.schema)?;
    check_session(&mut session, &boundaries)?;

    let previous = super::load_previous(args.previous.as_deref())?;
    let detector = if args.no_detect || !config::CONFIG.detect.enabled {
        tracing::debug!("detection disabled");
        None
    } else {
        Some(
            Detector::new(probes(args.detected.as_deref(), args.release_url.as_ref())?)
                .with_timeout(config::CONFIG.detect.timeout()),
        )
    };

    let stamp = Stamp::new(config::CONFIG.manifest.version_override.as_deref());
    let record = Resolver::new(&session, &previous, detector.as_ref())
        .with_stamp(stamp)
        .resolve_all()
        .await?;

    tracing::info!(
        identifier = %record.package_identifier,
        version = %record.package_version,
        "resolved default locale manifest"
    );
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn probes(detected: Option<&Path>, release_url: Option<&Url>) -> Result<Probes> {
    let fixed = detected
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            StaticProbe::from_toml(&content)
                .with_context(|| format!("invalid detected values in {}", path.display()))
        })
        .transpose()?;
    let github = release_url.and_then(|url| {
        let probe = GitHubReleaseProbe::from_url(url);
        if probe.is_none() {
            tracing::warn!(%url, "not a GitHub release asset, skipping URL detection");
        }
        probe
    });
    Ok((fixed, github))
}

/// Tallies boundary failures while session values are checked.
struct Checker<'a> {
    boundaries: &'a Boundaries,
    failures: usize,
}

impl Checker<'_> {
    fn accept(&mut self, category: FieldCategory, candidate: &str, allow_blank: bool) -> Option<String> {
        match self.boundaries.validate(candidate, category, allow_blank) {
            Ok(accepted) => Some(accepted),
            Err(e) => {
                tracing::error!(%category, "{e}");
                self.failures += 1;
                None
            },
        }
    }

    /// Replace an optional value with its accepted form; an accepted blank becomes `None`.
    fn optional(&mut self, category: FieldCategory, value: &mut Option<String>) {
        let Some(candidate) = value.as_deref() else {
            return;
        };
        if let Some(accepted) = self.accept(category, candidate, true) {
            *value = Some(accepted).filter(|s| !s.is_empty());
        }
    }
}

/// Run every session value through its field's boundaries, storing the accepted (trimmed)
/// value back in the session and reporting all failures at once.
fn check_session(session: &mut Session, boundaries: &Boundaries) -> Result<()> {
    let mut check = Checker {
        boundaries,
        failures: 0,
    };

    check.optional(FieldCategory::Publisher, &mut session.publisher);
    check.optional(FieldCategory::PackageName, &mut session.package_name);
    check.optional(FieldCategory::Moniker, &mut session.moniker);
    check.optional(FieldCategory::Author, &mut session.author);
    check.optional(FieldCategory::Copyright, &mut session.copyright);
    check.optional(FieldCategory::Description, &mut session.description);

    if let Some(license) = session.license().get().cloned() {
        if let Some(accepted) = check.accept(FieldCategory::License, &license, false) {
            session.set_license(accepted);
        }
    }
    if let Some(short) = session.short_description().get().cloned() {
        if let Some(accepted) = check.accept(FieldCategory::ShortDescription, &short, false) {
            session.set_short_description(accepted);
        }
    }
    for tag in session.tags.iter_mut().flatten() {
        if let Some(accepted) = check.accept(FieldCategory::Tag, tag, false) {
            *tag = accepted;
        }
    }

    let urls = [
        &session.publisher_url,
        &session.publisher_support_url,
        &session.privacy_url,
        &session.package_url,
        &session.license_url,
        &session.copyright_url,
        &session.release_notes_url,
    ];
    for url in urls.into_iter().flatten() {
        check.accept(FieldCategory::Url, url.as_str(), false);
    }

    if check.failures > 0 {
        anyhow::bail!("session holds {} invalid value(s)", check.failures);
    }
    Ok(())
}
