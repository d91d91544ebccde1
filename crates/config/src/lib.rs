//! Manages application configuration by loading settings from standard locations.
//!
//! This crate provides a unified configuration object (`Config`) that aggregates
//! settings from files and environment variables, making them accessible
//! globally via a lazily initialized static reference (`CONFIG`).

use std::sync::LazyLock;
use std::time::Duration;

use etcetera::BaseStrategy;
use figment::providers::{Env, Format, Toml};
use figment::{Figment, Metadata, Provider};
use serde::{Deserialize, Serialize};

/// The default configuration values
const DEFAULT_TOML_CONFIG: &str = include_str!("./forge.default.toml");

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_NAME: &str = ".forge.toml";

//================================================================================================
// Statics
//================================================================================================

/// Provides a lazily instantiated static reference to the application `Config`.
///
/// This static variable ensures that configuration is parsed only once from
/// canonical locations and then made immutably available throughout the
/// application's lifecycle.
pub static CONFIG: LazyLock<Config> = LazyLock::new(load_config);

//================================================================================================
// Types
//================================================================================================

/// Settings that affect the stamped metadata of produced manifests.
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ManifestConfig {
    /// Replaces the built-in manifest schema version when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_override: Option<String>,
}

/// Settings for detection against the source-hosting platform.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DetectConfig {
    /// Whether detected values are consulted at all.
    pub enabled: bool,
    /// Upper bound for a single probe, in seconds.
    pub timeout_secs: u64,
}

/// Represents the application's primary configuration structure.
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct Config {
    /// Manifest stamping settings.
    #[serde(default)]
    pub manifest: ManifestConfig,
    /// Detection settings.
    #[serde(default)]
    pub detect: DetectConfig,
}

//================================================================================================
// Impls
//================================================================================================

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 10,
        }
    }
}

impl DetectConfig {
    /// The probe timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Constructs a `Figment` instance for configuration loading.
    ///
    /// This method builds a configuration provider by layering default settings,
    /// user-specific configuration files, the working directory's `.forge.toml`
    /// and environment variables.
    pub fn figment() -> Figment {
        let mut fig = Figment::from(Config::default()).merge(Toml::string(DEFAULT_TOML_CONFIG));

        if let Ok(c) = etcetera::choose_base_strategy() {
            let config = c.config_dir().join("forge.toml");
            fig = fig.admerge(Toml::file(config));
        }

        fig.admerge(Toml::file(LOCAL_CONFIG_NAME))
            .admerge(Env::prefixed("FORGE_").split("__"))
    }
}

impl Provider for Config {
    fn metadata(&self) -> figment::Metadata {
        Metadata::named("Forge CLI Config")
    }

    fn data(
        &self,
    ) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        figment::providers::Serialized::defaults(self).data()
    }
}

//================================================================================================
// Functions
//================================================================================================

/// Loads the application configuration using the default `Figment` provider.
///
/// This function is used to initialize the `CONFIG` static variable.
fn load_config() -> Config {
    Config::figment().extract().unwrap_or_else(|e| {
        tracing::error!(error = %e, "problem loading config from default sources, falling back to defaults");
        Config::default()
    })
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults() {
        Jail::expect_with(|_| {
            let config: Config = Config::figment().extract()?;
            assert!(config.detect.enabled);
            assert_eq!(config.detect.timeout(), Duration::from_secs(10));
            assert!(config.manifest.version_override.is_none());
            Ok(())
        });
    }

    #[test]
    fn local_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_NAME,
                r#"
                [manifest]
                version_override = "1.5.0"

                [detect]
                timeout_secs = 3
                "#,
            )?;
            jail.set_env("FORGE_DETECT__ENABLED", "false");

            let config: Config = Config::figment().extract()?;
            assert_eq!(config.manifest.version_override.as_deref(), Some("1.5.0"));
            assert_eq!(config.detect.timeout_secs, 3);
            assert!(!config.detect.enabled);
            Ok(())
        });
    }
}
