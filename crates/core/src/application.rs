//! The application lifecycle: flags, arity, program logic, diagnostics.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Write;

use clap::{ArgMatches, Command};
use leon::Template;
use log::{debug, info, warn};

use crate::arity::Arity;
use crate::error::Result;
use crate::errors::ErrorCollector;
use crate::exit::{self, Flow, Mode, Outcome, Stop};
use crate::flags::{usage_message, FlagEvent, FlagRegistry};
use crate::redirect::{Stream, Streams};

/// The customizable parts of a command line program.
///
/// Every method has a default, so an empty implementation is a program that
/// accepts the standard flags and does nothing.
pub trait Program {
    /// The version printed by `--version`.
    fn version(&self) -> String {
        crate::VERSION.to_string()
    }

    /// Text printed before the list of flags by `--help`.
    ///
    /// May use the `{program}` and `{version}` placeholders. Text with any
    /// other braces is printed as written.
    fn help_before_options(&self) -> Option<String> {
        None
    }

    /// Text printed after the list of flags by `--help`.
    ///
    /// May use the `{program}` and `{version}` placeholders. Text with any
    /// other braces is printed as written.
    fn help_after_options(&self) -> Option<String> {
        None
    }

    /// The accepted positional arguments.
    fn arity(&self) -> Arity {
        Arity::none()
    }

    /// The streams that get a redirection flag.
    fn redirects(&self) -> &[Stream] {
        &Stream::ALL
    }

    /// Adds program specific flags to the command.
    fn define_flags(&self, command: Command) -> Command {
        command
    }

    /// Reads the program specific flags once parsing succeeded.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the run.
    fn apply_flags(&mut self, _matches: &ArgMatches) -> Result<()> {
        Ok(())
    }

    /// The program logic, reporting problems through `session.errors`.
    ///
    /// # Errors
    ///
    /// Returns [`Stop::Exit`] from [`Session::exit`] to stop early, or
    /// [`Stop::Fault`] for a fatal error.
    fn execute(&mut self, _session: &mut Session<'_>) -> Flow {
        Ok(())
    }
}

/// What [`Program::execute`] gets to work with.
pub struct Session<'a> {
    pub arguments: &'a [String],
    pub errors: &'a mut ErrorCollector,
    pub streams: &'a mut Streams,
    mode: Mode,
}

impl Session<'_> {
    pub fn program(&self) -> &str {
        self.errors.program()
    }

    /// Stops the program with `status`; see [`Application::run`].
    ///
    /// Diagnostics collected so far are not printed.
    pub fn exit(&mut self, status: i32) -> Stop {
        exit::exit(self.mode, self.streams, status)
    }
}

/// Runs a [`Program`] once.
pub struct Application<P: Program> {
    program: P,
    mode: Mode,
    streams: Streams,
    errors: ErrorCollector,
}

impl<P: Program> Application<P> {
    /// An application using the process standard streams.
    pub fn new(name: impl Into<String>, program: P, mode: Mode) -> Self {
        Self::with_streams(name, program, mode, Streams::stdio())
    }

    pub fn with_streams(name: impl Into<String>, program: P, mode: Mode, streams: Streams) -> Self {
        Self {
            program,
            mode,
            streams,
            errors: ErrorCollector::new(name),
        }
    }

    pub fn name(&self) -> &str {
        self.errors.program()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Runs the program with the command line `args`, not including the
    /// program name.
    ///
    /// The status of the returned [`Outcome`] is the number of diagnostics
    /// reported, or the status of an early exit. In production mode an early
    /// exit (help, version, usage problems) terminates the process instead.
    ///
    /// # Errors
    ///
    /// Returns fatal errors: failing to open a redirection target, failing
    /// to write to a stream, or any [`Stop::Fault`] from the program.
    pub fn run<I, T>(mut self, args: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        match self.execute(args) {
            Ok(diagnostics) => Ok(Outcome::completed(diagnostics)),
            Err(Stop::Exit(signal)) => {
                debug!("Run of `{}` exited with {}", self.name(), signal.status());
                Ok(Outcome::Exited(signal.status()))
            }
            Err(Stop::Fault(error)) => Err(error),
        }
    }

    fn execute<I, T>(&mut self, args: I) -> Flow<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let arguments = self.parse_flags(args)?;
        self.check_arity(&arguments)?;

        let mut session = Session {
            arguments: &arguments,
            errors: &mut self.errors,
            streams: &mut self.streams,
            mode: self.mode,
        };
        self.program.execute(&mut session)?;

        Ok(self.print_errors()?)
    }

    fn parse_flags<I, T>(&mut self, args: I) -> Flow<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let version = self.program.version();
        let redirects = self.program.redirects().to_vec();
        let mut registry = FlagRegistry::new(
            self.name(),
            &version,
            &self.program.arity(),
            &redirects,
        )
        .extend(|command| self.program.define_flags(command));

        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let matches = match registry.parse(args.iter().cloned()) {
            Ok(matches) => matches,
            Err(error) => {
                // Flags before the rejected one still take effect, in order
                let events = registry.events_before_rejection(&args, &error, &redirects);
                self.apply_events(events, &mut registry, &version)?;
                return Err(self.usage_error(&usage_message(&error)));
            }
        };

        let events = registry.events(&matches, &redirects);
        self.apply_events(events, &mut registry, &version)?;

        self.program.apply_flags(&matches)?;

        Ok(FlagRegistry::arguments(&matches))
    }

    fn apply_events(
        &mut self,
        events: Vec<FlagEvent>,
        registry: &mut FlagRegistry,
        version: &str,
    ) -> Flow {
        for event in events {
            debug!("Applying flag {:?}", event);
            match event {
                FlagEvent::Redirect(stream, target) => self.streams.redirect(stream, &target)?,
                FlagEvent::Help => {
                    self.print_help(registry, version)?;
                    return Err(self.exit(0));
                }
                FlagEvent::Version => {
                    writeln!(
                        self.streams.output(),
                        "{}: Version: {}",
                        self.errors.program(),
                        version
                    )?;
                    return Err(self.exit(0));
                }
            }
        }

        Ok(())
    }

    fn check_arity(&mut self, arguments: &[String]) -> Flow {
        match self.program.arity().violation(arguments.len()) {
            Some(message) => Err(self.usage_error(&message)),
            None => Ok(()),
        }
    }

    /// Reports a single usage problem right away and exits with 1.
    fn usage_error(&mut self, message: &str) -> Stop {
        warn!("Usage error: {}", message);
        let diagnostic = self.errors.annotate(message);
        if let Err(e) = writeln!(self.streams.error(), "{diagnostic}") {
            return Stop::from(e);
        }
        self.exit(1)
    }

    fn print_help(&mut self, registry: &mut FlagRegistry, version: &str) -> Result<()> {
        let usage = registry.render_help();
        let before = self.render_hook(self.program.help_before_options(), version)?;
        let after = self.render_hook(self.program.help_after_options(), version)?;

        let output = self.streams.output();
        if let Some(before) = before {
            writeln!(output, "{}", before.trim_end())?;
        }
        writeln!(output, "{}", usage.trim_end())?;
        if let Some(after) = after {
            writeln!(output, "{}", after.trim_end())?;
        }

        Ok(())
    }

    fn render_hook(&self, text: Option<String>, version: &str) -> Result<Option<String>> {
        let Some(text) = text else {
            return Ok(None);
        };

        let values: HashMap<String, String> = HashMap::from([
            ("program".to_string(), self.name().to_string()),
            ("version".to_string(), version.to_string()),
        ]);
        let known = |template: &Template<'_>| {
            template.keys().all(|key| values.contains_key(*key))
        };

        match Template::parse(&text) {
            Ok(template) if known(&template) => Ok(Some(template.render(&values)?)),
            _ => Ok(Some(text.clone())),
        }
    }

    fn print_errors(&mut self) -> Result<usize> {
        let count = self.errors.flush(self.streams.error())?;
        if count > 0 {
            info!("Reported {} diagnostics", count);
        }

        Ok(count)
    }

    fn exit(&mut self, status: i32) -> Stop {
        exit::exit(self.mode, &mut self.streams, status)
    }
}
