//! CLI Harness Core Library
//!
//! This crate provides a reusable base for command-line programs: standard
//! flags, redirection of the standard streams to files, diagnostics annotated
//! with the file and line being processed, and exits that can be observed
//! from tests instead of terminating the process.
//!
//! # Key Features
//!
//! - **Application Lifecycle**: Flag parsing, argument count checks, program logic, diagnostics
//! - **Standard Flags**: `--help`, `--version`, `--output`, `--error` and `--input`
//! - **Diagnostics**: Ordered collection with file and line context
//! - **Testable Exits**: Test mode turns exits into a returned status
//! - **Text Helpers**: Unindenting help text and YAML with sorted keys
//!
//! # Examples
//!
//! A program that reports one diagnostic per argument:
//!
//! ```
//! use cli_harness_core::{Application, Arity, Flow, Mode, Program, Session};
//!
//! struct Complain;
//!
//! impl Program for Complain {
//!     fn arity(&self) -> Arity {
//!         Arity::at_least(1, "complaints")
//!     }
//!
//!     fn execute(&mut self, session: &mut Session<'_>) -> Flow {
//!         for argument in session.arguments {
//!             session.errors.add(format!("Complaint about {argument}"));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let outcome = Application::new("complain", Complain, Mode::Test)
//!     .run(["--error", "-", "noise", "weather"])?;
//! assert_eq!(outcome.status(), 2);
//! # Ok::<(), cli_harness_core::error::Error>(())
//! ```

pub mod application;
pub mod arity;
pub mod error;
pub mod errors;
pub mod exit;
pub mod flags;
pub mod redirect;
pub mod sorted_yaml;
pub mod text;

pub use application::{Application, Program, Session};
pub use arity::Arity;
pub use errors::{Context, ErrorCollector, FileMode};
pub use exit::{ExitSignal, Flow, Mode, Outcome, Stop};
pub use redirect::{Stream, Streams};

/// The version of this crate, the default [`Program::version`].
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
