//! Diagnostic collection with file and line context.
//!
//! Programs report problems through an [`ErrorCollector`]. Each message is
//! annotated with the program name and, when one is active, the file path and
//! line number currently being processed. The context is changed through
//! scoped calls ([`ErrorCollector::in_path`], [`ErrorCollector::in_file`],
//! [`ErrorCollector::in_file_lines`]) which always restore the previous
//! context when they end.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::ops::{Deref, DerefMut};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

/// The file path and line number attached to newly added diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
    pub path: Option<String>,
    pub line: Option<usize>,
}

impl Context {
    fn in_path(path: String) -> Self {
        Self {
            path: Some(path),
            line: None,
        }
    }
}

/// How [`ErrorCollector::in_file`] opens its file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileMode {
    Read,
    Write,
    Append,
}

impl FileMode {
    fn open(self, path: &Path) -> std::io::Result<File> {
        match self {
            FileMode::Read => File::open(path),
            FileMode::Write => File::create(path),
            FileMode::Append => OpenOptions::new().append(true).create(true).open(path),
        }
    }
}

/// Ordered collection of annotated diagnostics.
#[derive(Debug)]
pub struct ErrorCollector {
    program: String,
    diagnostics: Vec<String>,
    context: Context,
}

impl ErrorCollector {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            diagnostics: Vec::new(),
            context: Context::default(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn path(&self) -> Option<&str> {
        self.context.path.as_deref()
    }

    pub fn line(&self) -> Option<usize> {
        self.context.line
    }

    /// Adds a diagnostic, annotated with the current context.
    pub fn add(&mut self, message: impl AsRef<str>) {
        let annotated = self.annotate(message.as_ref());
        debug!("Collected diagnostic: {}", annotated);
        self.diagnostics.push(annotated);
    }

    /// Appends a message as-is.
    ///
    /// This skips the program name and context annotation, so it must not be
    /// used for diagnostics meant for the user. Use [`ErrorCollector::add`].
    pub fn push_raw(&mut self, message: impl Into<String>) {
        self.diagnostics.push(message.into());
    }

    /// Returns `message` annotated with the current context, without storing it.
    pub fn annotate(&self, message: &str) -> String {
        match (&self.context.path, self.context.line) {
            (None, _) => format!("{}: {}", self.program, message),
            (Some(path), None) => format!("{}: {} in file: {}", self.program, message, path),
            (Some(path), Some(line)) => format!(
                "{}: {} in file: {} at line: {}",
                self.program, message, path, line
            ),
        }
    }

    /// Sets the line number for diagnostics added from here on.
    pub fn at_line(&mut self, line: usize) {
        self.context.line = Some(line);
    }

    /// Switches the context to `path` until the returned guard is dropped.
    pub fn scope(&mut self, path: impl Into<String>) -> Scope<'_> {
        let previous = std::mem::replace(&mut self.context, Context::in_path(path.into()));
        Scope {
            errors: self,
            previous: Some(previous),
        }
    }

    /// Runs `f` with all its diagnostics associated with `path`.
    pub fn in_path<T>(&mut self, path: impl Into<String>, f: impl FnOnce(&mut Self) -> T) -> T {
        let mut scope = self.scope(path);
        f(&mut *scope)
    }

    /// Like [`ErrorCollector::in_path`], also opening the file and handing it to `f`.
    ///
    /// The file is closed once `f` returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened in the given mode.
    pub fn in_file<T>(
        &mut self,
        path: impl AsRef<Path>,
        mode: FileMode,
        f: impl FnOnce(&mut Self, &mut File) -> T,
    ) -> Result<T> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let mut scope = self.scope(label.clone());
        let mut file = mode
            .open(path)
            .map_err(|e| Error::io_error("open", label, e))?;
        Ok(f(&mut *scope, &mut file))
    }

    /// Calls `f` with each line of the file, tracking the 1-based line number.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn in_file_lines<F>(&mut self, path: impl AsRef<Path>, f: F) -> Result<()>
    where
        F: FnMut(&mut Self, &str),
    {
        let path = path.as_ref();
        let label = path.display().to_string();
        self.in_file(path, FileMode::Read, |errors, file| {
            errors.each_line(&label, BufReader::new(file), f)
        })?
    }

    /// Like [`ErrorCollector::in_file_lines`] for an already open reader.
    ///
    /// `label` is reported as the path of the diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the reader fails.
    pub fn in_reader_lines<R, F>(&mut self, label: &str, reader: R, f: F) -> Result<()>
    where
        R: BufRead,
        F: FnMut(&mut Self, &str),
    {
        self.scope(label).each_line(label, reader, f)
    }

    /// Bytes that are not valid UTF-8 are passed to `f` as replacement characters.
    fn each_line<R, F>(&mut self, label: &str, mut reader: R, mut f: F) -> Result<()>
    where
        R: BufRead,
        F: FnMut(&mut Self, &str),
    {
        let mut buffer = Vec::new();
        let mut number = 0;

        loop {
            buffer.clear();
            let read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(|e| Error::io_error("read", label, e))?;
            if read == 0 {
                return Ok(());
            }

            number += 1;
            let content = buffer.strip_suffix(b"\n").unwrap_or(&buffer);
            let content = content.strip_suffix(b"\r").unwrap_or(content);
            let line = String::from_utf8_lossy(content);
            self.at_line(number);
            f(&mut *self, &line);
        }
    }

    /// Writes every diagnostic, one per line, in the order it was added.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub fn flush(&self, sink: &mut dyn Write) -> std::io::Result<usize> {
        for diagnostic in &self.diagnostics {
            writeln!(sink, "{diagnostic}")?;
        }
        sink.flush()?;

        Ok(self.diagnostics.len())
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.diagnostics.iter()
    }
}

impl<'a> IntoIterator for &'a ErrorCollector {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Guard returned by [`ErrorCollector::scope`].
///
/// Restores the context that was active before the scope on drop, including
/// when unwinding.
pub struct Scope<'a> {
    errors: &'a mut ErrorCollector,
    previous: Option<Context>,
}

impl Deref for Scope<'_> {
    type Target = ErrorCollector;

    fn deref(&self) -> &Self::Target {
        self.errors
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.errors
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.errors.context = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn collected(errors: &ErrorCollector) -> Vec<String> {
        errors.iter().cloned().collect()
    }

    #[test]
    fn test_one_error() {
        let mut errors = ErrorCollector::new("prog");
        errors.add("Oops");
        assert_eq!(collected(&errors), vec!["prog: Oops"]);
    }

    #[test]
    fn test_path_error() {
        let mut errors = ErrorCollector::new("prog");
        errors.in_path("foo", |errors| errors.add("Eeek"));
        errors.add("Oops");
        assert_eq!(
            collected(&errors),
            vec!["prog: Eeek in file: foo", "prog: Oops"]
        );
    }

    #[test]
    fn test_line_error() {
        let mut errors = ErrorCollector::new("prog");
        errors.in_path("foo", |errors| {
            errors.at_line(1);
            errors.add("Eeek");
        });
        errors.add("Oops");
        assert_eq!(
            collected(&errors),
            vec!["prog: Eeek in file: foo at line: 1", "prog: Oops"]
        );
    }

    #[test]
    fn test_annotation_shapes_are_distinct() {
        let mut errors = ErrorCollector::new("prog");
        let bare = errors.annotate("m");
        let mut scope = errors.scope("a.txt");
        let with_path = scope.annotate("m");
        scope.at_line(7);
        let with_line = scope.annotate("m");

        assert_eq!(bare, "prog: m");
        assert_eq!(with_path, "prog: m in file: a.txt");
        assert_eq!(with_line, "prog: m in file: a.txt at line: 7");
    }

    #[test]
    fn test_nested_paths_restore_outer_context() {
        let mut errors = ErrorCollector::new("prog");
        errors.in_path("a", |errors| {
            errors.at_line(3);
            errors.in_path("b", |errors| {
                assert_eq!(errors.path(), Some("b"));
                assert_eq!(errors.line(), None);
            });
            assert_eq!(errors.path(), Some("a"));
            assert_eq!(errors.line(), Some(3));
        });
        assert_eq!(errors.context(), &Context::default());
    }

    #[test]
    fn test_context_restored_after_error_result() {
        let mut errors = ErrorCollector::new("prog");
        let result: std::result::Result<(), &str> = errors.in_path("a", |errors| {
            errors.at_line(2);
            Err("failed")
        });
        assert!(result.is_err());
        assert_eq!(errors.path(), None);
        assert_eq!(errors.line(), None);
    }

    #[test]
    fn test_context_restored_after_panic() {
        let mut errors = ErrorCollector::new("prog");
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            errors.in_path("a", |_| panic!("boom"));
        }));
        assert!(outcome.is_err());
        assert_eq!(errors.path(), None);
    }

    #[test]
    fn test_in_path_returns_closure_result() {
        let mut errors = ErrorCollector::new("prog");
        let length = errors.in_path("abc", |errors| errors.path().map(str::len));
        assert_eq!(length, Some(3));
    }

    #[test]
    fn test_insertion_order_and_duplicates_preserved() {
        let mut errors = ErrorCollector::new("prog");
        errors.add("b");
        errors.add("a");
        errors.add("b");
        assert_eq!(collected(&errors), vec!["prog: b", "prog: a", "prog: b"]);
    }

    #[test]
    fn test_push_raw_skips_annotation() {
        let mut errors = ErrorCollector::new("prog");
        errors.in_path("foo", |errors| errors.push_raw("raw"));
        assert_eq!(collected(&errors), vec!["raw"]);
    }

    #[test]
    fn test_in_file_lines_tracks_line_numbers() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("input.txt");
        std::fs::write(&path, "good\nbad\ngood\nbad\n").unwrap();
        let label = path.display().to_string();

        let mut errors = ErrorCollector::new("prog");
        errors
            .in_file_lines(&path, |errors, line| {
                if line == "bad" {
                    errors.add("Bad line");
                }
            })
            .unwrap();

        assert_eq!(
            collected(&errors),
            vec![
                format!("prog: Bad line in file: {label} at line: 2"),
                format!("prog: Bad line in file: {label} at line: 4"),
            ]
        );
        assert_eq!(errors.context(), &Context::default());
    }

    #[test]
    fn test_in_file_missing_file_is_error() {
        let directory = tempfile::tempdir().unwrap();
        let mut errors = ErrorCollector::new("prog");
        let result = errors.in_file(directory.path().join("nope"), FileMode::Read, |_, _| ());
        assert!(matches!(result, Err(Error::Io { .. })));
        assert_eq!(errors.path(), None);
    }

    #[test]
    fn test_in_file_write_mode_passes_handle() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("out.txt");

        let mut errors = ErrorCollector::new("prog");
        errors
            .in_file(&path, FileMode::Write, |_, file| file.write_all(b"hello"))
            .unwrap()
            .unwrap();
        errors
            .in_file(&path, FileMode::Append, |_, file| file.write_all(b" world"))
            .unwrap()
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[test]
    fn test_in_reader_lines_uses_label() {
        let mut errors = ErrorCollector::new("prog");
        errors
            .in_reader_lines("standard input", Cursor::new("x\ny\n"), |errors, line| {
                if line == "y" {
                    errors.add("Found y");
                }
            })
            .unwrap();
        assert_eq!(
            collected(&errors),
            vec!["prog: Found y in file: standard input at line: 2"]
        );
    }

    #[test]
    fn test_lines_with_invalid_utf8_are_still_visited() {
        let input: &[u8] = b"ok\n\xff\xfe\r\nlast";
        let mut seen = Vec::new();

        let mut errors = ErrorCollector::new("prog");
        errors
            .in_reader_lines("binary", Cursor::new(input), |errors, line| {
                seen.push((errors.line(), line.to_string()));
            })
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (Some(1), "ok".to_string()),
                (Some(2), "\u{FFFD}\u{FFFD}".to_string()),
                (Some(3), "last".to_string()),
            ]
        );
    }

    #[test]
    fn test_flush_writes_in_order_and_counts() {
        let mut errors = ErrorCollector::new("prog");
        errors.add("first");
        errors.add("second");

        let mut sink: Vec<u8> = Vec::new();
        let count = errors.flush(&mut sink).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "prog: first\nprog: second\n"
        );
    }
}
