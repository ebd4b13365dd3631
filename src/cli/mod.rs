//! Command-line interface
//!
//! Dispatches a single invocation to one of three commands:
//! - `help`: usage text, no config loaded
//! - `print-config`: resolved loader options as JSON
//! - default run: everything else is forwarded verbatim to the loader
//!
//! Unlike a subcommand-style CLI, the default run must pass arguments
//! through untouched, so dispatch happens over the raw argument vector and
//! clap only parses the `print-config` flags.

mod help;
mod print_config;
mod run;

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use tracing::warn;

use crate::error::ConfigError;
use crate::loader::{loader_options_from_tsconfig, LoaderOptions};
use crate::utils::display_relative;

pub use print_config::PrintConfigArgs;

/// Literal first arguments recognized as commands
const COMMAND_PRINT_CONFIG: &str = "print-config";
const COMMAND_HELP: &str = "help";

/// A single CLI invocation over raw arguments
#[derive(Debug, Clone)]
pub struct Cli {
    args: Vec<String>,
}

impl Cli {
    /// Build from the process argument vector
    pub fn from_env() -> Self {
        Self {
            args: std::env::args().skip(1).collect(),
        }
    }

    /// Build from explicit arguments (tests, embedding)
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Execute the invocation, returning the exit code to propagate
    pub async fn execute(self) -> Result<i32> {
        if is_help_invocation(&self.args) {
            help::print_help();
            return Ok(0);
        }

        if self.args.first().map(String::as_str) == Some(COMMAND_PRINT_CONFIG) {
            return print_config::execute(&self.args).await;
        }

        run::execute(&self.args).await
    }
}

/// No arguments, `--help`/`-h` anywhere, or a literal `help` command
fn is_help_invocation(args: &[String]) -> bool {
    args.is_empty()
        || args.iter().any(|a| a == "--help" || a == "-h")
        || args.first().map(String::as_str) == Some(COMMAND_HELP)
}

/// Load loader options with the dispatcher's leniency policy.
///
/// An explicitly requested path that fails surfaces the reader's error.
/// A missing or broken config at the conventional default location degrades
/// to empty options with a warning, so the wrapper stays usable without any
/// path-alias configuration present.
///
/// Returns the options and whether a config was actually loaded.
pub(crate) fn load_options_lenient(
    path: &Path,
    explicit: bool,
) -> Result<(LoaderOptions, bool)> {
    match loader_options_from_tsconfig(path) {
        Ok(options) => Ok((options, true)),
        Err(error) if explicit => Err(error.into()),
        Err(ConfigError::NotFound { .. }) => {
            warn!(
                "No {} present in {}, continuing without tsconfig options",
                display_relative(path).bold(),
                std::env::current_dir()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| ".".to_string())
            );
            Ok((LoaderOptions::default(), false))
        }
        Err(error) => {
            warn!("Failed to load tsconfig from {}: {error}", path.display());
            Ok((LoaderOptions::default(), false))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn help_invocation_detection() {
        assert!(is_help_invocation(&args(&[])));
        assert!(is_help_invocation(&args(&["help"])));
        assert!(is_help_invocation(&args(&["--help"])));
        assert!(is_help_invocation(&args(&["-h"])));
        assert!(is_help_invocation(&args(&["print-config", "--help"])));

        assert!(!is_help_invocation(&args(&["./script.ts"])));
        assert!(!is_help_invocation(&args(&["print-config"])));
        // Only the first positional counts as a command name
        assert!(!is_help_invocation(&args(&["./script.ts", "help"])));
    }
}
