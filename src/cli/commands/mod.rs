mod resolve;
mod switches;
mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use manifest::Boundaries;
use manifest::previous::PreviousManifest;
use manifest::record::{DefaultLocaleManifest, InstallerManifest};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::Args;

#[derive(Subcommand)]
pub(super) enum Commands {
    /// Resolve the default locale manifest for a session.
    ///
    /// Every field is taken from the first source holding a value:
    ///
    /// - the session file
    /// - the previously published manifest, if given
    /// - values detected from the package's hosting platform
    /// - a field default
    ///
    /// The assembled manifest is printed to stdout as JSON.
    #[command(verbatim_doc_comment)]
    Resolve(resolve::Args),
    /// Validate a single value against its field's length boundaries.
    ///
    /// Prints the trimmed value when it is accepted.
    #[command(verbatim_doc_comment)]
    Validate(validate::Args),
    /// Show the installer switches inherited from a previous manifest.
    ///
    /// Switches are taken from the previous installer at the given
    /// position, falling back to the manifest-wide switches.
    #[command(verbatim_doc_comment)]
    Switches(switches::Args),
}

/// Previously published manifests, as stored on disk.
#[derive(Deserialize, Default)]
struct PreviousFile {
    #[serde(default)]
    default_locale: Option<DefaultLocaleManifest>,
    #[serde(default)]
    installer: Option<InstallerManifest>,
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Commands::Resolve(args) => resolve::run(args).await?,
        Commands::Validate(args) => validate::run(args)?,
        Commands::Switches(args) => switches::run(args)?,
    }
    Ok(())
}

//================================================================================================
// Functions
//================================================================================================

fn read_toml<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    toml_edit::de::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
}

fn load_previous(path: Option<&Path>) -> anyhow::Result<PreviousManifest> {
    let Some(path) = path else {
        return Ok(PreviousManifest::none());
    };
    let PreviousFile {
        default_locale,
        installer,
    } = read_toml(path)?;
    Ok(PreviousManifest::new(default_locale, installer))
}

/// Built-in boundaries, overridden by each schema in order.
fn load_boundaries(schemas: &[PathBuf]) -> anyhow::Result<Boundaries> {
    schemas.iter().try_fold(Boundaries::default(), |acc, path| {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read schema {}", path.display()))?;
        let schema: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON schema {}", path.display()))?;
        Ok(acc.merge(Boundaries::from_schema(&schema)))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use manifest::FieldCategory;
    use manifest::validate::switch::InstallerSwitch;

    use super::*;

    const PREVIOUS: &str = r#"
[installer]
PackageIdentifier = "Foo.Bar"
PackageVersion = "1.0.0"
ManifestType = "installer"
ManifestVersion = "1.6.0"

[installer.InstallerSwitches]
Silent = "/S"

[[installer.Installers]]
Architecture = "x64"

[installer.Installers.InstallerSwitches]
Silent = "/quiet"
"#;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = dir.path().join(name);
        std::fs::File::create(&path)?.write_all(content.as_bytes())?;
        Ok(path)
    }

    #[test]
    fn previous_file_is_optional() -> anyhow::Result<()> {
        assert_eq!(load_previous(None)?, PreviousManifest::none());
        Ok(())
    }

    #[test]
    fn previous_file_feeds_switch_fallback() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write(&dir, "previous.toml", PREVIOUS)?;
        let previous = load_previous(Some(&path))?;
        assert!(previous.default_locale().is_none());
        assert_eq!(
            previous.installer_switch(InstallerSwitch::Silent, 0),
            Some("/quiet")
        );
        assert_eq!(
            previous.installer_switch(InstallerSwitch::Silent, 1),
            Some("/S")
        );
        Ok(())
    }

    #[test]
    fn schemas_override_in_order() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let first = write(
            &dir,
            "first.json",
            r#"{"properties":{"Moniker":{"type":"string","maxLength":10}}}"#,
        )?;
        let second = write(
            &dir,
            "second.json",
            r#"{"properties":{"Moniker":{"type":"string","maxLength":3}}}"#,
        )?;
        let boundaries = load_boundaries(&[first, second])?;
        assert_eq!(boundaries.get(FieldCategory::Moniker).max, 3);
        Ok(())
    }

    #[test]
    fn unreadable_schema_is_an_error() {
        let missing = PathBuf::from("/nonexistent/schema.json");
        assert!(load_boundaries(&[missing]).is_err());
    }
}
