//! Source-to-object path mapping.

use crate::config::BuildConfig;
use crate::paths;
use camino::{Utf8Path, Utf8PathBuf};

/// Derive the object path for `source`.
///
/// When the file extension is one of the configured source extensions it is
/// replaced with the object extension; directories are left untouched. Any
/// other path is returned unchanged. The result is normalised like every
/// other emitted path.
///
/// # Examples
///
/// ```
/// use mkgen::config::BuildConfig;
/// use mkgen::target_map::object_path;
/// use camino::Utf8Path;
///
/// let config = BuildConfig::default();
/// assert_eq!(object_path(Utf8Path::new("lib/a.cpp"), &config).as_str(), "lib/a.o");
/// ```
#[must_use]
pub fn object_path(source: &Utf8Path, config: &BuildConfig) -> Utf8PathBuf {
    match source.extension() {
        Some(ext) if config.is_source_extension(ext) => {
            paths::normalise(&source.with_extension(&config.object_extension))
        }
        _ => paths::normalise(source),
    }
}
