//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! runs the pipeline: discover sources, assemble the [`BuildGraph`], render
//! it with [`make_gen`] and hand the text to a writer. The graph is complete
//! before anything is written, so a failing run never leaves a partial
//! Makefile behind.

use crate::cli::{Cli, Commands, DEFAULT_MAKEFILE, IncludeMatching};
use crate::config::BuildConfig;
use crate::includes::{IncludePolicy, SourceReader};
use crate::ir::{BuildGraph, SourceFile};
use crate::{discover, make_gen};
use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

/// Wrapper around generated Makefile text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakefileContent(String);
impl MakefileContent {
    /// Store the provided Makefile text.
    #[must_use]
    pub const fn new(content: String) -> Self {
        Self(content)
    }
    /// Borrow the underlying text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Execute the parsed [`Cli`] command.
///
/// # Errors
///
/// Returns an error if discovery, graph assembly or writing the output fails.
pub fn run(cli: &Cli) -> Result<()> {
    let command = cli
        .command
        .clone()
        .unwrap_or(Commands::Generate { file: None });
    match command {
        Commands::Generate { file } => handle_generate(cli, file.as_deref()),
        Commands::List => handle_list(cli),
        Commands::Graph => handle_graph(cli),
    }
}

/// Translate the command line into the pipeline configuration.
#[must_use]
pub fn build_config(cli: &Cli) -> BuildConfig {
    BuildConfig {
        output: cli.output.clone(),
        debug: cli.debug,
        compiler: cli.compiler.clone(),
        source_extensions: cli.source_ext.clone(),
        object_extension: cli.object_ext.clone(),
        include_policy: match cli.include_matching {
            IncludeMatching::Permissive => IncludePolicy::Permissive,
            IncludeMatching::Strict => IncludePolicy::Strict,
        },
    }
}

fn handle_generate(cli: &Cli, file: Option<&Path>) -> Result<()> {
    let dir = open_root(cli)?;
    generate_with(cli, file, &dir)
}

/// Render the Makefile reading sources through `reader`, then write it to
/// `file` (or the default Makefile beneath the project root).
fn generate_with(cli: &Cli, file: Option<&Path>, reader: &impl SourceReader) -> Result<()> {
    let content = render_makefile(cli, reader)?;
    let target = file.unwrap_or_else(|| Path::new(DEFAULT_MAKEFILE));
    if is_stdout_path(target) {
        write_stdout(content.as_str())
    } else {
        let path = resolve_output_path(cli, target);
        write_makefile(path.as_ref(), &content)
    }
}

fn handle_list(cli: &Cli) -> Result<()> {
    let root = resolve_root(cli)?;
    let sources = discover::discover_sources(&root, &build_config(cli))
        .with_context(|| format!("discovering sources under {root}"))?;
    let listing: String = sources.iter().map(|source| format!("{source}\n")).collect();
    write_stdout(&listing)
}

fn handle_graph(cli: &Cli) -> Result<()> {
    let dir = open_root(cli)?;
    let (graph, _) = assemble_graph(cli, &dir)?;
    let mut json = serde_json::to_string_pretty(&graph).context("serialising build graph")?;
    json.push('\n');
    write_stdout(&json)
}

/// Run the full pipeline and return the rendered Makefile.
fn render_makefile(cli: &Cli, reader: &impl SourceReader) -> Result<MakefileContent> {
    let (graph, config) = assemble_graph(cli, reader)?;
    if let Some(name) = &config.output {
        info!("Output file: {name}");
    }
    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("formatting generation timestamp")?;
    let text = make_gen::generate(&graph, &config, &generated_at)
        .context("rendering Makefile")?;
    Ok(MakefileContent::new(text))
}

fn assemble_graph(cli: &Cli, reader: &impl SourceReader) -> Result<(BuildGraph, BuildConfig)> {
    let config = build_config(cli);
    let root = resolve_root(cli)?;
    let sources: Vec<SourceFile> = discover::discover_sources(&root, &config)
        .with_context(|| format!("discovering sources under {root}"))?;
    info!("Discovered {} source files under {root}", sources.len());

    let graph = BuildGraph::assemble(&sources, reader, &config).context("building graph")?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        let json = serde_json::to_string_pretty(&graph).context("serialising build graph")?;
        debug!("Build graph:\n{json}");
    }
    Ok((graph, config))
}

fn resolve_root(cli: &Cli) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(cli.directory.clone())
        .map_err(|path| anyhow!("project root is not valid UTF-8: {}", path.display()))
}

fn open_root(cli: &Cli) -> Result<Dir> {
    let root = resolve_root(cli)?;
    Dir::open_ambient_dir(&root, ambient_authority())
        .with_context(|| format!("opening project root {root}"))
}

/// Return `true` when `path` is the CLI sentinel indicating "write to stdout".
#[must_use]
pub fn is_stdout_path(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Resolve an output path relative to the project root.
#[must_use]
fn resolve_output_path<'a>(cli: &Cli, path: &'a Path) -> Cow<'a, Path> {
    if path.is_relative() {
        Cow::Owned(cli.directory.join(path))
    } else {
        Cow::Borrowed(path)
    }
}

/// Write `content` to `path`, replacing any existing file atomically.
///
/// The text goes to a temporary file beside `path` first and is renamed into
/// place once flushed, so readers never see a half-written Makefile.
///
/// # Errors
///
/// Returns an error when the temporary file cannot be created, written or
/// persisted.
pub fn write_makefile(path: &Path, content: &MakefileContent) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("creating temporary file in {}", parent.display()))?;
    {
        let handle = tmp.as_file_mut();
        handle
            .write_all(content.as_str().as_bytes())
            .context("writing temporary Makefile")?;
        handle.flush().context("flushing temporary Makefile")?;
        handle.sync_all().context("syncing temporary Makefile")?;
    }
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("writing Makefile to {}", path.display()))?;
    info!("Generated Makefile at {}", display_utf8(path));
    Ok(())
}

fn display_utf8(path: &Path) -> Cow<'_, str> {
    Utf8Path::from_path(path).map_or_else(
        || Cow::Owned(path.display().to_string()),
        |p| Cow::Borrowed(p.as_str()),
    )
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    ignore_broken_pipe(stdout.write_all(text.as_bytes())).context("writing to stdout")?;
    ignore_broken_pipe(stdout.flush()).context("flushing stdout")?;
    Ok(())
}

fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
