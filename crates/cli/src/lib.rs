//! CLI Harness Example Program
//!
//! This crate provides `lncheck`, a small text checker built on
//! `cli-harness-core`. It reports tabs, trailing whitespace and overlong
//! lines with the file and line they were found in, and exits with the
//! number of problems found.
//!
//! # Architecture
//!
//! - [`cli_args`]: Flags of the checker on top of the standard harness flags
//! - [`config`]: Loading the rules from a YAML file
//! - [`rules`]: The checks applied to each line
//! - [`checker`]: The [`cli_harness_core::Program`] tying it together
//!
//! # Examples
//!
//! ```bash
//! # Check some files
//! lncheck notes.txt src/main.rs
//!
//! # Use custom rules and print a summary per file
//! lncheck --config-path rules.yml --summary notes.txt
//!
//! # Check standard input, or a file given as standard input
//! cat notes.txt | lncheck -
//! lncheck --input notes.txt -
//!
//! # Write the problems to a file
//! lncheck --error reports/problems.txt notes.txt
//! ```

pub mod checker;
pub mod cli_args;
pub mod config;
pub mod rules;
