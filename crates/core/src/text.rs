//! Helpers for multi-line text such as help messages.

/// Which prefix [`unindent`] strips from every line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unindent<'a> {
    /// The indentation of the first line.
    Auto,
    /// The indentation of the first line, less this many spaces.
    Extra(usize),
    /// Exactly this prefix.
    Exact(&'a str),
}

/// The spaces at the beginning of `text`.
pub fn indentation(text: &str) -> &str {
    let end = text.find(|c: char| c != ' ').unwrap_or(text.len());
    &text[..end]
}

/// Strips common indentation from the beginning of each line of `text`.
///
/// Lines that do not start with the prefix are left as they are.
///
/// ```
/// use cli_harness_core::text::{unindent, Unindent};
///
/// assert_eq!(unindent("    a\n      b\n", Unindent::Auto), "a\n  b\n");
/// assert_eq!(unindent("  a\n    b\n", Unindent::Extra(1)), " a\n   b\n");
/// ```
pub fn unindent(text: &str, how: Unindent<'_>) -> String {
    let prefix = match how {
        Unindent::Auto => indentation(text).to_string(),
        Unindent::Extra(spaces) => " ".repeat(indentation(text).len().saturating_sub(spaces)),
        Unindent::Exact(prefix) => prefix.to_string(),
    };

    text.split_inclusive('\n')
        .map(|line| line.strip_prefix(prefix.as_str()).unwrap_or(line))
        .collect()
}
