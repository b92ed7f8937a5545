//! Quoted include extraction.
//!
//! Sources are inspected line by line for `#include "..."` directives. Only
//! quoted includes are considered; angle-bracket includes name library
//! headers and are never resolved. Extraction is purely textual: targets are
//! not checked for existence and repeated includes are kept.

use crate::paths;
use camino::{Utf8Path, Utf8PathBuf};
use std::io;

/// Token that marks an include directive.
pub const INCLUDE_MARKER: &str = "#include";
const QUOTE: char = '"';

/// Rules for deciding whether a line declares a quoted include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IncludePolicy {
    /// Any line containing the marker and a double quote anywhere counts.
    ///
    /// The argument is the text between the first quote and the next one (or
    /// the end of the line). This mirrors scripts produced by earlier
    /// generators and may pick up quotes from trailing comments.
    #[default]
    Permissive,
    /// Only lines whose first token is the directive followed directly by a
    /// double-quoted argument count.
    Strict,
}

/// Read access to source text, keyed by root-relative path.
pub trait SourceReader {
    /// Return the full text of the source at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] when the source cannot be read.
    fn read_source(&self, path: &Utf8Path) -> io::Result<String>;
}

impl SourceReader for cap_std::fs_utf8::Dir {
    fn read_source(&self, path: &Utf8Path) -> io::Result<String> {
        // Headers in the wild are not always UTF-8; includes are ASCII.
        let bytes = self.read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Extract the quoted includes of `text`, resolved against `source_dir`.
///
/// `source_dir` is the root-relative directory of the declaring source. The
/// result keeps the order in which includes appear.
///
/// # Examples
///
/// ```
/// use mkgen::includes::{IncludePolicy, extract};
/// use camino::Utf8Path;
///
/// let text = "#include <vector>\n#include \"util.h\"\n";
/// let deps = extract(text, Utf8Path::new("lib"), IncludePolicy::Permissive);
/// assert_eq!(deps, vec![camino::Utf8PathBuf::from("lib/util.h")]);
/// ```
#[must_use]
pub fn extract(text: &str, source_dir: &Utf8Path, policy: IncludePolicy) -> Vec<Utf8PathBuf> {
    text.lines()
        .filter_map(|line| match policy {
            IncludePolicy::Permissive => permissive_argument(line),
            IncludePolicy::Strict => strict_argument(line),
        })
        .filter(|argument| !argument.is_empty())
        .map(|argument| paths::join_relative(source_dir, argument))
        .collect()
}

fn permissive_argument(line: &str) -> Option<&str> {
    if !line.contains(INCLUDE_MARKER) {
        return None;
    }
    let (_, rest) = line.split_once(QUOTE)?;
    Some(rest.split_once(QUOTE).map_or(rest, |(argument, _)| argument).trim())
}

fn strict_argument(line: &str) -> Option<&str> {
    let directive = line.trim_start().strip_prefix('#')?.trim_start();
    let rest = directive.strip_prefix("include")?.trim_start();
    let (argument, _) = rest.strip_prefix(QUOTE)?.split_once(QUOTE)?;
    Some(argument)
}
