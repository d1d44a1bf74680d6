//! Diagram sources collected from changed files.
//!
//! Paths are repository-relative and `/`-separated, as reported by the
//! hosting service. Standalone diagram files yield one source each, Markdown
//! files yield one source per named `PlantUML` fence.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{DIAGRAM_EXTENSIONS, MARKDOWN_EXTENSIONS};
use crate::fence::extract_fences;

/// A diagram ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSource {
    /// Output file stem (never empty).
    pub name: String,
    /// Diagram source including `@start`/`@end` directives.
    pub code: String,
    /// Repository-relative directory of the file the diagram came from.
    pub dir: String,
}

/// How a changed file contributes diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Standalone `PlantUML` file (`.puml`, `.pu`, ...).
    Diagram,
    /// Markdown document with `plantuml:<name>` fences.
    Markdown,
}

/// A classified file could not be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to read {path}: {source}")]
pub struct RetrieveError {
    /// Repository-relative path of the file.
    pub path: String,
    /// Underlying I/O error.
    pub source: std::io::Error,
}

/// Split a path into directory and file name.
fn split_path(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, path),
    }
}

/// Split a file name into stem and extension (including the dot).
///
/// A leading dot does not start an extension, so `.puml` has no extension.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => file_name.split_at(pos),
        _ => (file_name, ""),
    }
}

/// Classify a path by its extension.
///
/// Returns `None` for files that cannot contain diagrams.
#[must_use]
pub fn classify(path: &str) -> Option<SourceKind> {
    let (_, file_name) = split_path(path);
    let (_, ext) = split_extension(file_name);

    if DIAGRAM_EXTENSIONS.contains(&ext) {
        return Some(SourceKind::Diagram);
    }
    let is_markdown = MARKDOWN_EXTENSIONS
        .iter()
        .any(|md| file_name.len() > md.len() && file_name.ends_with(md));
    is_markdown.then_some(SourceKind::Markdown)
}

/// Read diagram sources from changed files.
///
/// `root` is the checkout the repository-relative `files` are read from.
/// Sources are returned in input order, Markdown fences in document order.
///
/// # Errors
///
/// Returns [`RetrieveError`] if a classified file cannot be read. Files that
/// do not classify are never touched.
pub fn retrieve_codes<S: AsRef<str>>(
    root: &Path,
    files: &[S],
) -> Result<Vec<DiagramSource>, RetrieveError> {
    let mut sources = Vec::new();

    for file in files {
        let path = file.as_ref();
        let Some(kind) = classify(path) else {
            continue;
        };
        let content = read_source(root, path)?;
        let (dir, file_name) = split_path(path);

        match kind {
            SourceKind::Diagram => {
                let (stem, _) = split_extension(file_name);
                debug!(path, "Read diagram file");
                sources.push(DiagramSource {
                    name: stem.to_owned(),
                    code: content,
                    dir: dir.unwrap_or_default().to_owned(),
                });
            }
            SourceKind::Markdown => {
                let fences = extract_fences(&content);
                debug!(path, count = fences.len(), "Scanned markdown file");
                let dir = dir.filter(|d| !d.is_empty()).unwrap_or(".");
                sources.extend(fences.into_iter().map(|fence| DiagramSource {
                    name: fence.name,
                    code: fence.code,
                    dir: dir.to_owned(),
                }));
            }
        }
    }

    Ok(sources)
}

fn read_source(root: &Path, path: &str) -> Result<String, RetrieveError> {
    let full_path: PathBuf = root.join(path);
    std::fs::read_to_string(&full_path).map_err(|source| RetrieveError {
        path: path.to_owned(),
        source,
    })
}
