//! The `lncheck` program: line-level checks of text files.

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;

use clap::{ArgMatches, Command};
use indexmap::IndexMap;
use log::debug;

use cli_harness_core::error::Result;
use cli_harness_core::text::{unindent, Unindent};
use cli_harness_core::{sorted_yaml, Arity, Flow, Program, Session};

use crate::cli_args::CheckerArgs;
use crate::config::{self, Rules};
use crate::rules::check_line;

/// Name used when the binary name cannot be determined.
pub const DEFAULT_PROGRAM_NAME: &str = "lncheck";

/// File argument that checks standard input.
pub const STANDARD_INPUT: &str = "-";

/// Path reported for diagnostics in standard input.
pub const STANDARD_INPUT_LABEL: &str = "standard input";

const EXAMPLES: &str = r"    EXAMPLES:
      {program} notes.txt src/main.rs
      {program} --config-path rules.yml --summary notes.txt
      {program} --input notes.txt -
";

/// The program name as invoked, without its directory.
pub fn program_name(argv0: Option<OsString>) -> String {
    argv0
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string())
}

#[derive(Debug, Default)]
pub struct Checker {
    args: CheckerArgs,
    rules: Rules,
}

impl Checker {
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    fn check_argument(&self, argument: &str, session: &mut Session<'_>) -> Result<()> {
        let rules = &self.rules;

        if argument == STANDARD_INPUT {
            return session.errors.in_reader_lines(
                STANDARD_INPUT_LABEL,
                session.streams.input(),
                |errors, line| check_line(rules, errors, line),
            );
        }

        let path = Path::new(argument);
        if !path.exists() {
            session
                .errors
                .in_path(argument, |errors| errors.add("File does not exist"));
            return Ok(());
        }
        if path.is_dir() {
            session
                .errors
                .in_path(argument, |errors| errors.add("Is a directory, not a file"));
            return Ok(());
        }

        session
            .errors
            .in_file_lines(path, |errors, line| check_line(rules, errors, line))
    }
}

impl Program for Checker {
    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn help_before_options(&self) -> Option<String> {
        Some("Check text files for tabs, trailing whitespace and long lines.".to_string())
    }

    fn help_after_options(&self) -> Option<String> {
        Some(unindent(EXAMPLES, Unindent::Auto))
    }

    fn arity(&self) -> Arity {
        Arity::at_least(1, "files to check")
    }

    fn define_flags(&self, command: Command) -> Command {
        CheckerArgs::define(command)
    }

    fn apply_flags(&mut self, matches: &ArgMatches) -> Result<()> {
        self.args = CheckerArgs::from_matches(matches)?;
        self.rules = config::load_rules(&self.args.config_path)?;
        debug!("Checking with {:?}", self.rules);
        Ok(())
    }

    fn execute(&mut self, session: &mut Session<'_>) -> Flow {
        let mut counts: IndexMap<String, usize> = IndexMap::new();

        for argument in session.arguments {
            let before = session.errors.len();
            self.check_argument(argument, session)?;

            let label = if argument == STANDARD_INPUT {
                STANDARD_INPUT_LABEL
            } else {
                argument.as_str()
            };
            *counts.entry(label.to_string()).or_default() += session.errors.len() - before;
        }

        if self.args.summary {
            let summary = sorted_yaml::to_string(&counts)?;
            write!(session.streams.output(), "{summary}")?;
        }

        Ok(())
    }
}
