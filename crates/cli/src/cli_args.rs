//! Command-line flags specific to `lncheck`.
//!
//! The standard flags (help, version and stream redirection) come from
//! `cli-harness-core`. This module only adds the flags of the checker, using
//! the `clap` derive API on top of the harness command.

use clap::{Args, Command, FromArgMatches};
use cli_harness_core::error::Result;

/// Flags of the `lncheck` binary, on top of the standard ones.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct CheckerArgs {
    /// Path to the rules config file YAML.
    ///
    /// If not provided, defaults to `~/.lncheck.yml` when that file exists.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config_path: Option<String>,

    /// Write a YAML summary of the number of problems in each file to standard output.
    #[arg(long, short = 's', action)]
    pub summary: bool,
}

impl CheckerArgs {
    /// Adds the checker flags to the harness command.
    pub fn define(command: Command) -> Command {
        Self::augment_args(command)
    }

    /// Reads the checker flags from parsed matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the matches do not hold the checker flags.
    pub fn from_matches(matches: &clap::ArgMatches) -> Result<Self> {
        Ok(Self::from_arg_matches(matches)?)
    }
}
