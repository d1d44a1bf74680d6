//! Internal constants for diagram extraction and rendering.

/// Public `PlantUML` server used when no custom server is configured.
pub const DEFAULT_SERVER: &str = "https://www.plantuml.com/plantuml";

/// Diagram type used when a fence declares none (`@startuml`).
pub const DEFAULT_UML_TYPE: &str = "uml";

/// Extensions of standalone diagram files.
pub const DIAGRAM_EXTENSIONS: &[&str] = &[".pu", ".pml", ".puml", ".plantuml"];

/// Extensions of Markdown files scanned for `plantuml:<name>` fences.
///
/// `.md.txt` is a compound suffix and is matched against the whole file name.
pub const MARKDOWN_EXTENSIONS: &[&str] = &[
    ".md", ".markdown", ".mdown", ".mkdn", ".mdwn", ".mkd", ".mdn", ".md.txt",
];
