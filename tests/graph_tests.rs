//! Build graph assembly tests.

use camino::{Utf8Path, Utf8PathBuf};
use mkgen::config::BuildConfig;
use mkgen::includes::SourceReader;
use mkgen::ir::{BuildGraph, GraphError, SourceFile};
use rstest::{fixture, rstest};
use std::collections::HashMap;
use std::io;

/// Sources held in memory, keyed by root-relative path.
struct MemoryTree(HashMap<Utf8PathBuf, String>);

impl MemoryTree {
    fn new(files: &[(&str, &str)]) -> Self {
        Self(
            files
                .iter()
                .map(|(path, text)| (Utf8PathBuf::from(*path), (*text).to_owned()))
                .collect(),
        )
    }

    fn sources(paths: &[&str]) -> Vec<SourceFile> {
        paths.iter().map(|p| SourceFile::from_relative(*p)).collect()
    }
}

impl SourceReader for MemoryTree {
    fn read_source(&self, path: &Utf8Path) -> io::Result<String> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}

#[fixture]
fn config() -> BuildConfig {
    BuildConfig::default()
}

fn objects(graph: &BuildGraph) -> Vec<&str> {
    graph.objects.iter().map(|t| t.object.as_str()).collect()
}

#[rstest]
fn one_object_per_source_in_discovery_order(config: BuildConfig) {
    let tree = MemoryTree::new(&[("z.cpp", ""), ("a.cpp", ""), ("lib/m.cpp", "")]);
    let sources = MemoryTree::sources(&["z.cpp", "a.cpp", "lib/m.cpp"]);
    let graph = BuildGraph::assemble(&sources, &tree, &config).expect("assemble");

    assert_eq!(objects(&graph), ["z.o", "a.o", "lib/m.o"]);
    for (target, source) in graph.objects.iter().zip(&sources) {
        assert_eq!(&target.source, source);
    }
}

#[rstest]
fn sources_without_includes_have_no_dependencies(config: BuildConfig) {
    let tree = MemoryTree::new(&[("a.cpp", "#include <vector>\nint a;\n")]);
    let graph = BuildGraph::assemble(&MemoryTree::sources(&["a.cpp"]), &tree, &config)
        .expect("assemble");
    let target = graph.objects.first().expect("one object");
    assert!(target.dependencies.is_empty());
    let prereqs: Vec<_> = target.prerequisites().collect();
    assert_eq!(prereqs, [Utf8Path::new("a.cpp")]);
}

#[rstest]
fn includes_resolve_relative_to_the_source_directory(config: BuildConfig) {
    let tree = MemoryTree::new(&[
        ("lib/main.cpp", "#include \"util.h\"\n"),
        ("main.cpp", "#include \"lib/util.h\"\n"),
    ]);
    let sources = MemoryTree::sources(&["lib/main.cpp", "main.cpp"]);
    let graph = BuildGraph::assemble(&sources, &tree, &config).expect("assemble");

    let deps: Vec<Vec<&str>> = graph
        .objects
        .iter()
        .map(|t| t.dependencies.iter().map(|p| p.as_str()).collect())
        .collect();
    assert_eq!(deps, [vec!["lib/util.h"], vec!["lib/util.h"]]);
}

#[rstest]
fn aggregate_lists_objects_without_binary(config: BuildConfig) {
    let tree = MemoryTree::new(&[("a.cpp", ""), ("b.cpp", "")]);
    let graph = BuildGraph::assemble(&MemoryTree::sources(&["a.cpp", "b.cpp"]), &tree, &config)
        .expect("assemble");
    assert!(graph.binary.is_none());
    assert_eq!(graph.aggregate(), ["a.o", "b.o"]);
    assert_eq!(graph.clean.removes, ["a.o", "b.o"]);
}

#[rstest]
fn aggregate_depends_only_on_binary_when_named() {
    let config = BuildConfig {
        output: Some("app".into()),
        ..BuildConfig::default()
    };
    let tree = MemoryTree::new(&[("a.cpp", ""), ("b.cpp", "")]);
    let graph = BuildGraph::assemble(&MemoryTree::sources(&["a.cpp", "b.cpp"]), &tree, &config)
        .expect("assemble");

    assert_eq!(graph.aggregate(), ["app"]);
    let binary = graph.binary.as_ref().expect("binary target");
    let linked: Vec<&str> = binary.objects.iter().map(|p| p.as_str()).collect();
    assert_eq!(linked, ["a.o", "b.o"]);
    assert_eq!(graph.clean.removes, ["a.o", "b.o", "app"]);
}

#[rstest]
fn unreadable_source_aborts_assembly(config: BuildConfig) {
    let tree = MemoryTree::new(&[("a.cpp", ""), ("c.cpp", "")]);
    let sources = MemoryTree::sources(&["a.cpp", "b.cpp", "c.cpp"]);
    let err = BuildGraph::assemble(&sources, &tree, &config).expect_err("missing source");
    match err {
        GraphError::ReadSource { path, source } => {
            assert_eq!(path, "b.cpp");
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn colliding_objects_are_rejected() {
    let config = BuildConfig {
        source_extensions: vec!["cpp".into(), "cc".into()],
        ..BuildConfig::default()
    };
    let tree = MemoryTree::new(&[("a.cpp", ""), ("a.cc", "")]);
    let err = BuildGraph::assemble(&MemoryTree::sources(&["a.cc", "a.cpp"]), &tree, &config)
        .expect_err("collision");
    assert!(
        matches!(err, GraphError::DuplicateObject { ref object, .. } if object == "a.o"),
        "unexpected error: {err}"
    );
}

#[rstest]
fn no_emitted_path_starts_with_a_separator(config: BuildConfig) {
    let tree = MemoryTree::new(&[
        ("main.cpp", "#include \"/abs.h\"\n#include \"./here.h\"\n"),
        ("lib/x.cpp", "#include \"/y.h\"\n"),
    ]);
    let sources = vec![
        SourceFile::from_relative("/main.cpp"),
        SourceFile::from_relative("lib/x.cpp"),
    ];
    let graph = BuildGraph::assemble(&sources, &tree, &config).expect("assemble");
    for target in &graph.objects {
        assert!(!target.object.as_str().starts_with('/'));
        for prereq in target.prerequisites() {
            assert!(!prereq.as_str().starts_with('/'), "leading separator in {prereq}");
        }
    }
}

#[rstest]
fn object_overwriting_its_source_is_rejected() {
    let config = BuildConfig {
        object_extension: "cpp".into(),
        ..BuildConfig::default()
    };
    let tree = MemoryTree::new(&[("main.cpp", "")]);
    let err = BuildGraph::assemble(&MemoryTree::sources(&["main.cpp"]), &tree, &config)
        .expect_err("object equals source");
    assert!(
        matches!(err, GraphError::ObjectIsSource { ref object, .. } if object == "main.cpp"),
        "unexpected error: {err}"
    );
}

#[rstest]
fn object_overwriting_another_source_is_rejected() {
    let config = BuildConfig {
        source_extensions: vec!["cpp".into(), "cc".into()],
        object_extension: "cc".into(),
        ..BuildConfig::default()
    };
    let tree = MemoryTree::new(&[("a.cc", ""), ("a.cpp", "")]);
    let err = BuildGraph::assemble(&MemoryTree::sources(&["a.cpp", "a.cc"]), &tree, &config)
        .expect_err("object equals another source");
    assert!(
        matches!(
            err,
            GraphError::ObjectIsSource { ref object, ref source_file }
                if object == "a.cc" && source_file == "a.cpp"
        ),
        "unexpected error: {err}"
    );
}

#[rstest]
#[case("main.o", "main.o")]
#[case("./main.o", "main.o")]
#[case("main.cpp", "main.cpp")]
#[case("lib/util.cpp", "lib/util.cpp")]
fn binary_clashing_with_tree_paths_is_rejected(#[case] name: &str, #[case] clash: &str) {
    let config = BuildConfig {
        output: Some(name.into()),
        ..BuildConfig::default()
    };
    let tree = MemoryTree::new(&[("main.cpp", ""), ("lib/util.cpp", "")]);
    let sources = MemoryTree::sources(&["main.cpp", "lib/util.cpp"]);
    let err = BuildGraph::assemble(&sources, &tree, &config).expect_err("binary collision");
    assert!(
        matches!(err, GraphError::BinaryCollision { ref path, .. } if path == clash),
        "unexpected error: {err}"
    );
}

#[rstest]
fn binary_named_like_a_directory_entry_elsewhere_is_accepted() {
    let config = BuildConfig {
        output: Some("util".into()),
        ..BuildConfig::default()
    };
    let tree = MemoryTree::new(&[("lib/util.cpp", "")]);
    let graph = BuildGraph::assemble(&MemoryTree::sources(&["lib/util.cpp"]), &tree, &config)
        .expect("assemble");
    assert_eq!(graph.aggregate(), ["util"]);
}
