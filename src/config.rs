//! Build configuration consumed by the graph assembler and the emitter.
//!
//! The command line is translated into a [`BuildConfig`] by the runner so the
//! core pipeline stays independent of argument parsing.

use crate::includes::IncludePolicy;

/// Compiler invoked by generated recipes unless overridden.
pub const DEFAULT_COMPILER: &str = "g++";
/// Suffix of compilable sources unless overridden.
pub const DEFAULT_SOURCE_EXTENSION: &str = "cpp";
/// Suffix of compiled objects unless overridden.
pub const DEFAULT_OBJECT_EXTENSION: &str = "o";
/// Flag appended to compile recipes when debug builds are requested.
pub const DEBUG_FLAG: &str = "-g";

/// Options recognised by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Name of the final link target, if one should be produced.
    pub output: Option<String>,
    /// Append [`DEBUG_FLAG`] to every compile recipe.
    pub debug: bool,
    /// Compiler driver used for compiling and linking.
    pub compiler: String,
    /// Extensions (without the leading dot) that mark compilable sources.
    pub source_extensions: Vec<String>,
    /// Extension (without the leading dot) given to object targets.
    pub object_extension: String,
    /// How include directives are recognised.
    pub include_policy: IncludePolicy,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: None,
            debug: false,
            compiler: DEFAULT_COMPILER.to_owned(),
            source_extensions: vec![DEFAULT_SOURCE_EXTENSION.to_owned()],
            object_extension: DEFAULT_OBJECT_EXTENSION.to_owned(),
            include_policy: IncludePolicy::default(),
        }
    }
}

impl BuildConfig {
    /// Report whether `extension` marks a compilable source.
    #[must_use]
    pub fn is_source_extension(&self, extension: &str) -> bool {
        self.source_extensions.iter().any(|ext| ext == extension)
    }
}
