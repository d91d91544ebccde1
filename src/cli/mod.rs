//! Command line surface of the Forge CLI.

mod commands;
pub mod logging;

use std::path::PathBuf;

use clap::Parser;
pub use commands::run;
pub use logging::init_global_subscriber;

/// Top-level arguments.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Change the current working directory
    ///
    /// If specified, changes the current working directory to the given
    /// path before executing any commands. Relative input paths and the
    /// `.forge.toml` lookup are resolved against it.
    #[arg(short = 'C', value_name = "DIR", global = true, value_parser = validate_path)]
    working_directory: Option<PathBuf>,

    /// Logging options.
    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    command: commands::Commands,
}

/// Flags controlling log output.
#[derive(Parser, Clone, Copy, Debug)]
#[command(next_help_heading = "Log Options")]
pub struct LogArgs {
    /// Set the level of verbosity
    ///
    /// This flag can be used multiple times to increase verbosity:
    /// 1. -v    for DEBUG level, which logs the source each field was resolved from
    /// 2. -vv   for TRACE level
    ///
    /// If not specified, defaults to INFO level.
    ///
    /// Alternatively, set the `RUST_LOG` environment variable (e.g., `RUST_LOG=info`), which takes
    /// precedence over this flag.
    ///
    /// **Note**: This flag is silently ignored when `--quiet` is also set.
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity",
    )]
    verbosity: u8,

    /// Suppress verbosity (*takes precedent*)
    ///
    /// This flag can be used multiple times to decrease verbosity:
    /// 1. -q    for WARN level
    /// 2. -qq   for ERROR level
    ///
    /// This flag *overrides* any verbosity settings. It takes precedence over both the
    /// `--verbosity` flag and the `RUST_LOG` environment variable.
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
    )]
    quiet: u8,
}

fn validate_path(path: &str) -> Result<PathBuf, std::io::Error> {
    std::fs::canonicalize(path)
}

/// Collect the process arguments, switching to the `-C` directory before clap sees them.
///
/// The directory is canonicalized against the starting directory and handed on to clap in
/// that absolute form, so validating it again after the switch finds the same path.
pub fn change_directory() -> Vec<String> {
    let (args, directory) = absolute_directory_args(std::env::args());
    if let Some(directory) = directory {
        std::env::set_current_dir(directory).ok();
    }
    args
}

fn absolute_directory_args(args: impl IntoIterator<Item = String>) -> (Vec<String>, Option<PathBuf>) {
    let mut pending = false;
    let mut directory = None;
    let args = args
        .into_iter()
        .map(|arg| {
            if !std::mem::take(&mut pending) {
                pending = arg == "-C";
                return arg;
            }
            match std::fs::canonicalize(&arg) {
                Ok(path) => {
                    let absolute = path.to_string_lossy().into_owned();
                    directory = Some(path);
                    absolute
                },
                Err(_) => arg,
            }
        })
        .collect();
    (args, directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_directory_is_made_absolute() -> anyhow::Result<()> {
        // tests run from the package root, which holds `src`
        let args = ["forge", "-C", "src", "validate"].map(String::from);
        let (args, directory) = absolute_directory_args(args);

        let expected = std::fs::canonicalize("src")?;
        assert!(expected.is_absolute());
        assert_eq!(directory.as_deref(), Some(expected.as_path()));
        assert_eq!(args[2], expected.to_string_lossy());
        assert_eq!(validate_path(&args[2])?, expected);
        assert_eq!(args[3], "validate");
        Ok(())
    }

    #[test]
    fn missing_directory_is_left_for_clap() {
        let args = ["forge", "-C", "does/not/exist"].map(String::from);
        let (args, directory) = absolute_directory_args(args);
        assert_eq!(directory, None);
        assert_eq!(args[2], "does/not/exist");
    }
}
