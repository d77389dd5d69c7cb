//! Standard stream handles and their redirection to files.

use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};

/// Path value meaning "keep the current stream".
pub const DEFAULT_STREAM: &str = "-";

/// The standard streams a program can redirect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    Output,
    Error,
    Input,
}

impl Stream {
    pub const ALL: [Stream; 3] = [Stream::Output, Stream::Error, Stream::Input];

    /// Long flag name, also used as the clap argument id.
    pub fn name(self) -> &'static str {
        match self {
            Stream::Output => "output",
            Stream::Error => "error",
            Stream::Input => "input",
        }
    }

    pub fn short(self) -> char {
        match self {
            Stream::Output => 'o',
            Stream::Error => 'e',
            Stream::Input => 'i',
        }
    }

    pub fn is_write(self) -> bool {
        !matches!(self, Stream::Input)
    }
}

impl Display for Stream {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "standard {}", self.name())
    }
}

/// Owned handles for the output, error and input streams of one run.
pub struct Streams {
    output: Box<dyn Write>,
    error: Box<dyn Write>,
    input: Box<dyn BufRead>,
}

impl Streams {
    pub fn new(output: Box<dyn Write>, error: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        Self {
            output,
            error,
            input,
        }
    }

    /// The process standard streams.
    pub fn stdio() -> Self {
        Self::new(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            Box::new(BufReader::new(io::stdin())),
        )
    }

    pub fn output(&mut self) -> &mut dyn Write {
        self.output.as_mut()
    }

    pub fn error(&mut self) -> &mut dyn Write {
        self.error.as_mut()
    }

    pub fn input(&mut self) -> &mut dyn BufRead {
        self.input.as_mut()
    }

    /// Replaces `stream` with the file at `target`.
    ///
    /// [`DEFAULT_STREAM`] leaves the stream untouched. Parent directories of
    /// an output or error file are created first. The replaced handle is
    /// flushed and dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or the file cannot
    /// be opened.
    pub fn redirect(&mut self, stream: Stream, target: &str) -> Result<()> {
        if target == DEFAULT_STREAM {
            debug!("Keeping {} untouched", stream);
            return Ok(());
        }

        let expanded = shellexpand::tilde(target).to_string();
        let path = Path::new(&expanded);
        info!("Redirecting {} to `{}`", stream, expanded);

        match stream {
            Stream::Input => {
                let file = File::open(path).map_err(|e| Error::io_error("read", &expanded, e))?;
                self.input = Box::new(BufReader::new(file));
            }
            Stream::Output | Stream::Error => {
                create_parent_directories(path)?;
                let file =
                    File::create(path).map_err(|e| Error::io_error("write", &expanded, e))?;
                let replaced = if stream == Stream::Output {
                    std::mem::replace(&mut self.output, Box::new(file))
                } else {
                    std::mem::replace(&mut self.error, Box::new(file))
                };
                flush_replaced(replaced)?;
            }
        }

        Ok(())
    }

    /// Flushes the output and error streams.
    ///
    /// # Errors
    ///
    /// Returns an error if either stream fails to flush.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()?;
        self.error.flush()
    }
}

impl Default for Streams {
    fn default() -> Self {
        Self::stdio()
    }
}

fn create_parent_directories(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }

    debug!("Creating directory `{}`", parent.display());
    fs::create_dir_all(parent)
        .map_err(|e| Error::io_error("create directory for", parent.display().to_string(), e))
}

fn flush_replaced(mut replaced: Box<dyn Write>) -> Result<()> {
    replaced.flush()?;
    Ok(())
}
