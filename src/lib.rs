//! mkgen core library.
//!
//! Scans a source tree for C++ translation units, collects their quoted
//! includes and renders a Makefile that compiles each unit into an object
//! and optionally links the objects into a named binary.

pub mod cli;
pub mod config;
pub mod discover;
pub mod includes;
pub mod ir;
pub mod make_gen;
pub mod paths;
pub mod runner;
pub mod target_map;
