//! Test utilities for building throwaway source trees.
//!
//! Integration tests describe a project as `(path, contents)` pairs and get
//! back a temporary directory laid out accordingly.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use mkgen::make_gen::is_header_line;
use std::fs;
use tempfile::TempDir;

/// Timestamp used wherever tests need deterministic generator output.
pub const FIXED_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

/// A temporary project tree removed when dropped.
#[derive(Debug)]
pub struct SourceTree {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl SourceTree {
    /// Create a tree containing `files`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any file cannot be created, or if
    /// the temporary directory path is not UTF-8.
    pub fn new(files: &[(&str, &str)]) -> Result<Self> {
        let dir = TempDir::new().context("create temporary source tree")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow::anyhow!("non-UTF-8 temp dir: {}", path.display()))?;
        let tree = Self { _dir: dir, root };
        for (path, contents) in files {
            tree.write(path, contents)?;
        }
        Ok(tree)
    }

    /// Write `contents` to `path` inside the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be created.
    pub fn write(&self, path: &str, contents: &str) -> Result<()> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        fs::write(&full, contents).with_context(|| format!("write {full}"))
    }

    /// Root directory of the tree.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Drop the generated header so two renders can be compared.
#[must_use]
pub fn without_header(text: &str) -> String {
    text.lines()
        .filter(|line| !is_header_line(line))
        .map(|line| format!("{line}\n"))
        .collect()
}
