//! Intermediate representation of a generated build.
//!
//! A [`BuildGraph`] holds one [`ObjectTarget`] per discovered source, in
//! discovery order, together with the optional link target and the clean
//! target. It is assembled once per run and handed to the emitter.
//!
//! # Examples
//!
//! ```
//! use mkgen::config::BuildConfig;
//! use mkgen::ir::{BuildGraph, SourceFile};
//! use camino::Utf8Path;
//! use std::io;
//!
//! struct NoIncludes;
//! impl mkgen::includes::SourceReader for NoIncludes {
//!     fn read_source(&self, _: &Utf8Path) -> io::Result<String> {
//!         Ok(String::from("int main() {}\n"))
//!     }
//! }
//!
//! let sources = vec![SourceFile::from_relative("main.cpp")];
//! let graph = BuildGraph::assemble(&sources, &NoIncludes, &BuildConfig::default())
//!     .expect("assemble");
//! assert_eq!(graph.objects[0].object.as_str(), "main.o");
//! ```

mod assemble;
mod graph;

pub use graph::{BinaryTarget, BuildGraph, CleanTarget, GraphError, ObjectTarget, SourceFile};
