//! Makefile generator.
//!
//! This module converts a [`BuildGraph`] into Makefile text. Rules appear in
//! a fixed order: the header comment, `all`, the optional link rule, one
//! compile rule per object in discovery order, and finally `clean`. Apart
//! from the timestamp in the header the output depends only on the graph and
//! the configuration.

use crate::config::{BuildConfig, DEBUG_FLAG};
use crate::ir::{BinaryTarget, BuildGraph, CleanTarget, ObjectTarget};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter, Write};

/// Name reported in the generated header.
pub const GENERATOR: &str = concat!("mkgen ", env!("CARGO_PKG_VERSION"));

/// Prefix of the header line; everything after it varies with the timestamp.
pub const HEADER_PREFIX: &str = "# Makefile generated by ";

/// Generate a Makefile as a string.
///
/// `generated_at` is copied verbatim into the header comment.
///
/// # Errors
///
/// Returns [`fmt::Error`] if writing to the output string fails, which is not
/// expected under normal conditions.
///
/// # Examples
///
/// ```
/// use mkgen::config::BuildConfig;
/// use mkgen::ir::BuildGraph;
/// use mkgen::make_gen::generate;
///
/// let text = generate(&BuildGraph::default(), &BuildConfig::default(), "now").expect("render");
/// assert!(text.contains("\nall :\n"));
/// ```
pub fn generate(
    graph: &BuildGraph,
    config: &BuildConfig,
    generated_at: &str,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{HEADER_PREFIX}{GENERATOR} at {generated_at}")?;
    writeln!(out, "all :{}", Prereqs(graph.aggregate()))?;

    if let Some(binary) = &graph.binary {
        write!(
            out,
            "{}",
            DisplayLink {
                binary,
                compiler: &config.compiler,
            }
        )?;
    }
    for target in &graph.objects {
        write!(
            out,
            "{}",
            DisplayCompile {
                target,
                compiler: &config.compiler,
                debug: config.debug,
            }
        )?;
    }
    write!(out, "{}", DisplayClean(&graph.clean))?;
    Ok(out)
}

/// Report whether `line` is the generated header.
///
/// Comparisons between two generated files should skip this line.
#[must_use]
pub fn is_header_line(line: &str) -> bool {
    line.starts_with(HEADER_PREFIX)
}

/// Space-prefixed list of words; renders nothing when empty.
struct Prereqs<I>(I);

impl<I> Display for Prereqs<I>
where
    I: IntoIterator + Clone,
    I::Item: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for item in self.0.clone() {
            write!(f, " {item}")?;
        }
        Ok(())
    }
}

/// Wrapper struct to display the link rule.
struct DisplayLink<'a> {
    binary: &'a BinaryTarget,
    compiler: &'a str,
}

impl Display for DisplayLink<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let objects = &self.binary.objects;
        writeln!(f)?;
        writeln!(f, "{} :{}", self.binary.name, Prereqs(objects))?;
        writeln!(
            f,
            "\t{} -o {}{}",
            self.compiler,
            self.binary.name,
            Prereqs(objects)
        )
    }
}

/// Wrapper struct to display one compile rule.
struct DisplayCompile<'a> {
    target: &'a ObjectTarget,
    compiler: &'a str,
    debug: bool,
}

impl Display for DisplayCompile<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let target = self.target;
        writeln!(f)?;
        writeln!(
            f,
            "{} : {}",
            target.object,
            target.prerequisites().join(" ")
        )?;
        write!(
            f,
            "\t{} -c {} -o {}",
            self.compiler, target.source, target.object
        )?;
        if self.debug {
            write!(f, " {DEBUG_FLAG}")?;
        }
        writeln!(f)
    }
}

/// Wrapper struct to display the clean rule.
struct DisplayClean<'a>(&'a CleanTarget);

impl Display for DisplayClean<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "clean :")?;
        writeln!(f, "\trm -f{}", Prereqs(&self.0.removes))
    }
}
