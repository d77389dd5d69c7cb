//! Exit handling for applications that can run inside tests.

use std::process::ExitCode;

use log::{debug, info};

use crate::error::Error;
use crate::redirect::Streams;

/// Whether exiting terminates the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Exiting terminates the process.
    Production,
    /// Exiting unwinds to [`crate::Application::run`], which returns the status.
    Test,
}

/// Request to stop the program with a status, used in test mode.
#[derive(Debug, PartialEq, Eq)]
pub struct ExitSignal {
    status: i32,
}

impl ExitSignal {
    pub(crate) fn new(status: i32) -> Self {
        Self { status }
    }

    pub fn status(&self) -> i32 {
        self.status
    }
}

/// Why a run stopped before completing.
#[derive(Debug)]
pub enum Stop {
    Exit(ExitSignal),
    Fault(Error),
}

impl From<Error> for Stop {
    fn from(error: Error) -> Self {
        Self::Fault(error)
    }
}

impl From<std::io::Error> for Stop {
    fn from(error: std::io::Error) -> Self {
        Self::Fault(Error::Stdio(error))
    }
}

pub type Flow<T = ()> = std::result::Result<T, Stop>;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Completed without diagnostics.
    Success,
    /// Completed after reporting this many diagnostics.
    Diagnostics(usize),
    /// Stopped early through an exit with this status.
    Exited(i32),
}

impl Outcome {
    pub(crate) fn completed(diagnostics: usize) -> Self {
        if diagnostics == 0 {
            Outcome::Success
        } else {
            Outcome::Diagnostics(diagnostics)
        }
    }

    pub fn status(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Diagnostics(count) => i32::try_from(count).unwrap_or(i32::MAX),
            Outcome::Exited(status) => status,
        }
    }

    pub fn is_success(self) -> bool {
        self.status() == 0
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        let status = outcome.status().clamp(0, i32::from(u8::MAX));
        ExitCode::from(u8::try_from(status).unwrap_or(u8::MAX))
    }
}

/// Stops the program with `status`.
///
/// In production mode the streams are flushed and the process terminates
/// here. In test mode the returned [`Stop`] must be propagated to `run`.
pub(crate) fn exit(mode: Mode, streams: &mut Streams, status: i32) -> Stop {
    match mode {
        Mode::Production => {
            info!("Exiting with status {}", status);
            if let Err(e) = streams.flush() {
                debug!("Could not flush streams before exiting: {}", e);
            }
            std::process::exit(status)
        }
        Mode::Test => {
            debug!("Exit with status {} requested in test mode", status);
            Stop::Exit(ExitSignal::new(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_exit_in_test_mode_returns_signal() {
        let mut streams = Streams::new(
            Box::new(Vec::new()),
            Box::new(Vec::new()),
            Box::new(Cursor::new(Vec::new())),
        );
        match exit(Mode::Test, &mut streams, 3) {
            Stop::Exit(signal) => assert_eq!(signal.status(), 3),
            Stop::Fault(e) => panic!("Expected an exit signal, got {e}"),
        }
    }

    #[test]
    fn test_outcome_status() {
        assert_eq!(Outcome::completed(0), Outcome::Success);
        assert_eq!(Outcome::completed(4).status(), 4);
        assert_eq!(Outcome::Exited(1).status(), 1);
        assert!(Outcome::Exited(0).is_success());
        assert!(!Outcome::Diagnostics(2).is_success());
    }
}
