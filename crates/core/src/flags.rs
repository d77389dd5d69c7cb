//! Registration and parsing of the standard application flags.
//!
//! The [`FlagRegistry`] owns the `clap` [`Command`] of a run. It defines the
//! help, version and redirection flags, lets the program add its own, and
//! reports the standard flags as [`FlagEvent`]s in the order they appeared
//! on the command line.

use std::ffi::OsString;

use clap::error::{ContextKind, ContextValue};
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};
use log::debug;

use crate::arity::Arity;
use crate::redirect::Stream;

pub const HELP: &str = "help";
pub const VERSION: &str = "version";
pub const ARGUMENTS: &str = "arguments";

/// A standard flag found on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlagEvent {
    Help,
    Version,
    Redirect(Stream, String),
}

pub struct FlagRegistry {
    command: Command,
}

impl FlagRegistry {
    pub fn new(program: &str, version: &str, arity: &Arity, streams: &[Stream]) -> Self {
        let mut command = Command::new(program.to_string())
            .term_width(0)
            .color(ColorChoice::Never)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true)
            .arg(
                Arg::new(HELP)
                    .short('h')
                    .long("help")
                    .action(ArgAction::SetTrue)
                    .help("Print this help message and exit."),
            )
            .arg(
                Arg::new(VERSION)
                    .short('v')
                    .long("version")
                    .action(ArgAction::SetTrue)
                    .help(format!("Print the version number {version} and exit.")),
            );

        for stream in streams {
            command = command.arg(
                Arg::new(stream.name())
                    .short(stream.short())
                    .long(stream.name())
                    .value_name("FILE")
                    .action(ArgAction::Set)
                    .help(format!("Redirect {stream} to a file.")),
            );
        }

        // Always accepted by clap so that arity problems get our own message
        let mut arguments = Arg::new(ARGUMENTS)
            .value_name("FILE")
            .num_args(1..)
            .action(ArgAction::Append)
            .hide(!arity.accepts_arguments());
        if let Some(label) = &arity.label {
            arguments = arguments.help(format!("The {label}."));
        }

        Self {
            command: command.arg(arguments),
        }
    }

    /// Lets the program add its own flags to the command.
    #[must_use]
    pub fn extend(self, define: impl FnOnce(Command) -> Command) -> Self {
        Self {
            command: define(self.command),
        }
    }

    /// Parses `args`, which exclude the program name.
    ///
    /// # Errors
    ///
    /// Returns the `clap` error for unknown flags or missing flag values.
    pub fn parse<I, T>(&mut self, args: I) -> Result<ArgMatches, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv = self.argv(args);
        debug!("Parsing command line: {:?}", argv);
        self.command.try_get_matches_from_mut(argv)
    }

    /// The standard flags that came before the flag `error` rejected.
    ///
    /// When the rejected flag cannot be located, the whole command line is
    /// searched for standard flags.
    pub fn events_before_rejection(
        &self,
        args: &[OsString],
        error: &clap::Error,
        streams: &[Stream],
    ) -> Vec<FlagEvent> {
        let end = rejected_position(args, error).unwrap_or(args.len());
        let argv = self.argv(args[..end].iter().cloned());
        debug!("Salvaging flags from: {:?}", argv);
        match self.command.clone().ignore_errors(true).try_get_matches_from(argv) {
            Ok(matches) => self.events(&matches, streams),
            Err(_) => Vec::new(),
        }
    }

    fn argv<I, T>(&self, args: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let program = OsString::from(self.command.get_name());
        std::iter::once(program)
            .chain(args.into_iter().map(Into::into))
            .collect()
    }

    /// The standard flags of `matches` in command line order.
    pub fn events(&self, matches: &ArgMatches, streams: &[Stream]) -> Vec<FlagEvent> {
        let mut events: Vec<(usize, FlagEvent)> = Vec::new();

        for (id, event) in [(HELP, FlagEvent::Help), (VERSION, FlagEvent::Version)] {
            // Partial matches may lack the `false` default
            if matches!(matches.get_one::<bool>(id), Some(true)) {
                if let Some(index) = matches.index_of(id) {
                    events.push((index, event));
                }
            }
        }

        for stream in streams {
            if let (Some(target), Some(index)) = (
                matches.get_one::<String>(stream.name()),
                matches.index_of(stream.name()),
            ) {
                events.push((index, FlagEvent::Redirect(*stream, target.clone())));
            }
        }

        events.sort_by_key(|(index, _)| *index);
        events.into_iter().map(|(_, event)| event).collect()
    }

    pub fn arguments(matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>(ARGUMENTS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    /// The usage text listing every registered flag.
    pub fn render_help(&mut self) -> String {
        self.command.render_help().to_string()
    }
}

/// Index in `args` of the flag `error` is about.
fn rejected_position(args: &[OsString], error: &clap::Error) -> Option<usize> {
    let Some(ContextValue::String(invalid)) = error.get(ContextKind::InvalidArg) else {
        return None;
    };
    // Missing values are reported as `--flag <VALUE>`
    let flag = invalid.split_whitespace().next()?;
    let attached = format!("{flag}=");

    args.iter().position(|arg| {
        let arg = arg.to_string_lossy();
        arg == flag || arg.starts_with(&attached)
    })
}

/// The one-line description of a `clap` parsing error.
pub fn usage_message(error: &clap::Error) -> String {
    let rendered = error.render().to_string();
    let first_line = rendered.lines().next().unwrap_or_default();
    first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .trim()
        .to_string()
}
