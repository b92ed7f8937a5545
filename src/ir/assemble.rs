//! Source-to-graph assembly.

use std::collections::{HashMap, HashSet};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use crate::config::BuildConfig;
use crate::includes::{self, SourceReader};
use crate::paths;
use crate::target_map;

use super::graph::{BinaryTarget, BuildGraph, CleanTarget, GraphError, ObjectTarget, SourceFile};

impl BuildGraph {
    /// Assemble the build graph for `sources`.
    ///
    /// Sources keep the order they are given in. Each source is read once
    /// through `reader` to collect its quoted includes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ReadSource`] on the first unreadable source,
    /// [`GraphError::DuplicateObject`] when two sources map to one object,
    /// [`GraphError::ObjectIsSource`] when an object would overwrite a source
    /// and [`GraphError::BinaryCollision`] when the binary name matches a
    /// source or an object.
    pub fn assemble(
        sources: &[SourceFile],
        reader: &impl SourceReader,
        config: &BuildConfig,
    ) -> Result<Self, GraphError> {
        let objects = Self::process_sources(sources, reader, config)?;
        if let Some(name) = &config.output {
            check_binary_name(name, sources, &objects)?;
        }
        let binary = config.output.as_ref().map(|name| BinaryTarget {
            name: name.clone(),
            objects: objects.iter().map(|target| target.object.clone()).collect(),
        });
        let clean = clean_target(&objects, binary.as_ref());
        Ok(Self {
            objects,
            binary,
            clean,
        })
    }

    fn process_sources(
        sources: &[SourceFile],
        reader: &impl SourceReader,
        config: &BuildConfig,
    ) -> Result<Vec<ObjectTarget>, GraphError> {
        let source_paths: HashSet<&Utf8Path> = sources.iter().map(SourceFile::path).collect();
        let mut claimed: HashMap<Utf8PathBuf, Utf8PathBuf> = HashMap::new();
        let mut objects = Vec::with_capacity(sources.len());
        for source in sources {
            let object = target_map::object_path(source.path(), config);
            if source_paths.contains(object.as_path()) {
                return Err(GraphError::ObjectIsSource {
                    object,
                    source_file: source.path().to_path_buf(),
                });
            }
            if let Some(first) = claimed.insert(object.clone(), source.path().to_path_buf()) {
                return Err(GraphError::DuplicateObject {
                    object,
                    first,
                    second: source.path().to_path_buf(),
                });
            }
            let dependencies = read_dependencies(source, reader, config)?;
            if paths::has_whitespace(source.path()) {
                warn!(source = %source, "path contains whitespace; make will split it");
            }
            objects.push(ObjectTarget {
                object,
                source: source.clone(),
                dependencies,
            });
        }
        Ok(objects)
    }
}

fn read_dependencies(
    source: &SourceFile,
    reader: &impl SourceReader,
    config: &BuildConfig,
) -> Result<Vec<Utf8PathBuf>, GraphError> {
    let text = reader
        .read_source(source.path())
        .map_err(|err| GraphError::ReadSource {
            path: source.path().to_path_buf(),
            source: err,
        })?;
    let dependencies = includes::extract(&text, source.dir(), config.include_policy);
    debug!(
        source = %source,
        count = dependencies.len(),
        "extracted quoted includes"
    );
    Ok(dependencies)
}

/// The binary is built and removed by name, so it must not alias a source or
/// an object.
fn check_binary_name(
    name: &str,
    sources: &[SourceFile],
    objects: &[ObjectTarget],
) -> Result<(), GraphError> {
    let binary = paths::normalise(Utf8Path::new(name));
    sources
        .iter()
        .map(SourceFile::path)
        .chain(objects.iter().map(|target| target.object.as_path()))
        .find(|path| *path == binary.as_path())
        .map_or(Ok(()), |path| {
            Err(GraphError::BinaryCollision {
                name: name.to_owned(),
                path: path.to_path_buf(),
            })
        })
}

fn clean_target(objects: &[ObjectTarget], binary: Option<&BinaryTarget>) -> CleanTarget {
    let removes = objects
        .iter()
        .map(|target| target.object.to_string())
        .chain(binary.map(|bin| bin.name.clone()))
        .collect();
    CleanTarget { removes }
}
