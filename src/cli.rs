//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. Every
//! option can also be supplied through an `MKGEN_`-prefixed environment
//! variable; explicit flags win.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default name of the generated build script.
pub const DEFAULT_MAKEFILE: &str = "Makefile";

fn parse_binary_name(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err(String::from("output name must not be empty"));
    }
    if s.chars().any(char::is_whitespace) {
        return Err(format!("output name '{s}' must not contain whitespace"));
    }
    Ok(s.to_owned())
}

/// Parse a file extension, accepting an optional leading dot.
fn parse_extension(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    let ext = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if ext.is_empty() {
        return Err(String::from("extension must not be empty"));
    }
    if ext.contains(['/', '\\', '.']) || ext.chars().any(char::is_whitespace) {
        return Err(format!("invalid extension '{s}'"));
    }
    Ok(ext.to_owned())
}

/// How `#include` lines are recognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum IncludeMatching {
    /// Any line with the directive and a double quote anywhere.
    #[default]
    Permissive,
    /// Only `#include "..."` directives at the start of a line.
    Strict,
}

/// Generate a Makefile for every C++ source below a project root.
#[derive(Debug, Parser)]
#[command(name = "mkgen", author, version, about, long_about = None)]
pub struct Cli {
    /// Project root to scan; the Makefile is written here by default.
    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        default_value = ".",
        env = "MKGEN_DIRECTORY"
    )]
    pub directory: PathBuf,

    /// Name of the linked binary; adds a link rule when given.
    #[arg(
        short = 'o',
        long,
        value_name = "NAME",
        value_parser = parse_binary_name,
        env = "MKGEN_OUTPUT"
    )]
    pub output: Option<String>,

    /// Compile every source with debug information.
    #[arg(short = 'g', long, env = "MKGEN_DEBUG")]
    pub debug: bool,

    /// Compiler driver used in generated recipes.
    #[arg(long, value_name = "PROGRAM", default_value = "g++", env = "MKGEN_COMPILER")]
    pub compiler: String,

    /// Extension of compilable sources; repeat or comma-separate for several.
    #[arg(
        long = "source-ext",
        value_name = "EXT",
        default_value = "cpp",
        value_delimiter = ',',
        value_parser = parse_extension,
        env = "MKGEN_SOURCE_EXT"
    )]
    pub source_ext: Vec<String>,

    /// Extension given to compiled objects.
    #[arg(
        long = "object-ext",
        value_name = "EXT",
        default_value = "o",
        value_parser = parse_extension,
        env = "MKGEN_OBJECT_EXT"
    )]
    pub object_ext: String,

    /// How `#include` lines are recognised.
    #[arg(
        long = "include-matching",
        value_enum,
        default_value_t = IncludeMatching::Permissive,
        env = "MKGEN_INCLUDE_MATCHING"
    )]
    pub include_matching: IncludeMatching,

    /// Enable verbose diagnostic logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `generate` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `generate` as the default command.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::parse().with_default_command()
    }

    /// Parse the provided arguments, applying the default command when needed.
    ///
    /// # Errors
    ///
    /// Returns the clap error when the arguments are invalid.
    pub fn try_parse_from_with_default<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::with_default_command)
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Generate { file: None });
        }
        self
    }
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Write the Makefile (default command).
    Generate {
        /// Output path, relative to the project root; `-` writes to stdout.
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Print every discovered source file, one per line.
    List,

    /// Print the assembled build graph as JSON.
    Graph,
}
