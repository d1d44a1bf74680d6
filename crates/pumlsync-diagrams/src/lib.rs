//! `PlantUML` diagram extraction and SVG rendering for pumlsync.
//!
//! This crate turns changed repository files into renderable diagrams:
//! - [`extract_fences`] finds `plantuml(@<type>)?:<name>` fences in Markdown
//! - [`retrieve_codes`] routes files by extension and reads their diagrams
//! - [`PlantUmlRenderer`] renders diagram source to SVG via a `PlantUML` server
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pumlsync_diagrams::{PlantUmlRenderer, Render, retrieve_codes};
//!
//! let sources = retrieve_codes(Path::new("."), &["docs/flow.puml", "README.md"])?;
//! let renderer = PlantUmlRenderer::new();
//! for source in &sources {
//!     let svg = renderer.render(&source.code)?;
//! }
//! ```

mod consts;
mod encoding;
mod fence;
mod render;
mod source;

pub use consts::{DEFAULT_SERVER, DIAGRAM_EXTENSIONS, MARKDOWN_EXTENSIONS};
pub use encoding::encode;
pub use fence::{DiagramFence, extract_fences};
pub use render::{BasicAuth, PlantUmlRenderer, Render, RenderError, RenderOptions};
pub use source::{DiagramSource, RetrieveError, SourceKind, classify, retrieve_codes};
