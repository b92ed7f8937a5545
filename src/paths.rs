//! Path normalisation shared by discovery, include resolution and object
//! mapping.
//!
//! Every path that ends up in a generated Makefile passes through this module
//! so separator handling and root stripping live in one place. Normalised
//! paths are relative to the project root, use [`SEPARATOR`] between
//! components and never start with a separator.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Separator used when rendering paths into the build script.
pub const SEPARATOR: char = '/';

/// Errors raised while normalising filesystem paths.
#[derive(Debug, Error)]
pub enum PathError {
    /// The path cannot be represented as UTF-8 and so cannot be emitted.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8(PathBuf),
}

/// Make `path` relative to `root` and normalise it.
///
/// Paths outside `root` are normalised as they are. Leading separators,
/// drive prefixes and `.` components are dropped.
///
/// # Errors
///
/// Returns [`PathError::NonUtf8`] when `path` is not valid UTF-8.
///
/// # Examples
///
/// ```
/// use mkgen::paths::root_relative;
/// use std::path::Path;
///
/// let rel = root_relative(Path::new("/work/proj"), Path::new("/work/proj/lib/a.cpp"))
///     .expect("utf-8 path");
/// assert_eq!(rel.as_str(), "lib/a.cpp");
/// ```
pub fn root_relative(root: &Path, path: &Path) -> Result<Utf8PathBuf, PathError> {
    let stripped = path.strip_prefix(root).unwrap_or(path);
    let utf8 = Utf8Path::from_path(stripped).ok_or_else(|| PathError::NonUtf8(path.to_path_buf()))?;
    Ok(normalise(utf8))
}

/// Render `path` using [`SEPARATOR`], dropping root, prefix and `.` components.
///
/// `..` components are kept verbatim; no lexical collapsing happens.
#[must_use]
pub fn normalise(path: &Utf8Path) -> Utf8PathBuf {
    join_components(path.components())
}

/// Resolve `include` against `dir`, producing a root-relative path.
///
/// The include text is appended to the directory even when it looks
/// absolute, matching how a literal prefix would read.
///
/// # Examples
///
/// ```
/// use mkgen::paths::join_relative;
/// use camino::Utf8Path;
///
/// assert_eq!(join_relative(Utf8Path::new("lib"), "util.h").as_str(), "lib/util.h");
/// assert_eq!(join_relative(Utf8Path::new(""), "util.h").as_str(), "util.h");
/// ```
#[must_use]
pub fn join_relative(dir: &Utf8Path, include: &str) -> Utf8PathBuf {
    join_components(dir.components().chain(Utf8Path::new(include).components()))
}

fn join_components<'a>(components: impl Iterator<Item = Utf8Component<'a>>) -> Utf8PathBuf {
    let mut out = String::new();
    for component in components {
        let part = match component {
            Utf8Component::Normal(part) => part,
            Utf8Component::ParentDir => "..",
            Utf8Component::Prefix(_) | Utf8Component::RootDir | Utf8Component::CurDir => continue,
        };
        if !out.is_empty() {
            out.push(SEPARATOR);
        }
        out.push_str(part);
    }
    Utf8PathBuf::from(out)
}

/// Report whether `path` contains characters Make treats as word separators.
#[must_use]
pub fn has_whitespace(path: &Utf8Path) -> bool {
    path.as_str().chars().any(char::is_whitespace)
}
