//! Source discovery beneath the project root.
//!
//! The tree is walked recursively with entries sorted by file name so that
//! repeated runs over an unchanged tree yield the same order.

use crate::config::BuildConfig;
use crate::ir::SourceFile;
use crate::paths::PathError;
use camino::Utf8Path;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Errors raised while walking the source tree.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A directory entry could not be read.
    #[error("failed to walk source tree")]
    Walk(#[from] walkdir::Error),
    /// A discovered path cannot be represented as UTF-8.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Collect regular files under `root` whose extension marks a source in `config`.
///
/// # Errors
///
/// Returns [`DiscoveryError`] when the walk fails or a path is not UTF-8.
pub fn discover_sources(
    root: &Utf8Path,
    config: &BuildConfig,
) -> Result<Vec<SourceFile>, DiscoveryError> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| config.is_source_extension(ext));
        if !matches {
            continue;
        }
        let source = SourceFile::new(root.as_std_path(), entry.path())?;
        debug!(source = %source, "discovered source");
        sources.push(source);
    }
    Ok(sources)
}
