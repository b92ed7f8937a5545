//! Core build graph types.

use crate::paths::{self, PathError};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;

/// A compilable unit, identified by its root-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceFile(Utf8PathBuf);

impl SourceFile {
    /// Create a source from a path discovered beneath `root`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NonUtf8`] when `path` is not valid UTF-8.
    pub fn new(root: &Path, path: &Path) -> Result<Self, PathError> {
        paths::root_relative(root, path).map(Self)
    }

    /// Create a source from a path that is already relative to the root.
    #[must_use]
    pub fn from_relative(path: impl AsRef<Utf8Path>) -> Self {
        Self(paths::normalise(path.as_ref()))
    }

    /// Borrow the root-relative path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.0
    }

    /// Root-relative directory containing the source; empty at the root.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        self.0.parent().unwrap_or_else(|| Utf8Path::new(""))
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Compiled object derived from exactly one [`SourceFile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectTarget {
    /// Root-relative path of the object file.
    pub object: Utf8PathBuf,
    /// Source compiled into this object.
    pub source: SourceFile,
    /// Quoted includes of the source, in order of appearance.
    pub dependencies: Vec<Utf8PathBuf>,
}

impl ObjectTarget {
    /// Prerequisites of the compile rule: the source followed by its includes.
    pub fn prerequisites(&self) -> impl Iterator<Item = &Utf8Path> {
        std::iter::once(self.source.path()).chain(self.dependencies.iter().map(Utf8PathBuf::as_path))
    }
}

/// Final link target producing the named binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryTarget {
    /// File name of the linked binary.
    pub name: String,
    /// Objects linked into the binary, in discovery order.
    pub objects: Vec<Utf8PathBuf>,
}

/// Target removing every generated artefact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanTarget {
    /// Files removed by the rule, objects first, then the binary.
    pub removes: Vec<String>,
}

/// The whole build derived from one source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildGraph {
    /// One entry per source, in discovery order.
    pub objects: Vec<ObjectTarget>,
    /// Present when an output binary name was configured.
    pub binary: Option<BinaryTarget>,
    /// Always present.
    pub clean: CleanTarget,
}

impl BuildGraph {
    /// Prerequisites of the aggregate `all` target.
    ///
    /// With a binary this is the binary alone; otherwise every object.
    #[must_use]
    pub fn aggregate(&self) -> Vec<&str> {
        self.binary.as_ref().map_or_else(
            || self.objects.iter().map(|target| target.object.as_str()).collect(),
            |binary| vec![binary.name.as_str()],
        )
    }
}

/// Errors produced while assembling a [`BuildGraph`].
#[derive(Debug, Error)]
pub enum GraphError {
    /// A source file could not be read.
    #[error("failed to read source '{path}'")]
    ReadSource {
        /// Root-relative path of the unreadable source.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Two sources map to the same object file.
    #[error("sources '{first}' and '{second}' both compile to '{object}'")]
    DuplicateObject {
        /// Object path claimed twice.
        object: Utf8PathBuf,
        /// Source that claimed the object first.
        first: Utf8PathBuf,
        /// Source that collided with it.
        second: Utf8PathBuf,
    },
    /// An object path equals a source path, so compiling would overwrite it.
    #[error("object '{object}' for '{source_file}' would overwrite a source file")]
    ObjectIsSource {
        /// Object path that names an existing source.
        object: Utf8PathBuf,
        /// Source the object was derived from.
        source_file: Utf8PathBuf,
    },
    /// The binary name equals a source or object path.
    #[error("binary name '{name}' clashes with '{path}'")]
    BinaryCollision {
        /// Configured binary name.
        name: String,
        /// Source or object path it clashes with.
        path: Utf8PathBuf,
    },
}
