//! Named `PlantUML` fences in Markdown documents.
//!
//! A fenced code block is a diagram when its info string follows the grammar
//! `plantuml(@<type>)?:<name>`:
//!
//! ````markdown
//! ```plantuml:login-flow
//! Alice -> Bob : hello
//! ```
//!
//! ```plantuml@mindmap:ideas
//! * root
//! ** child
//! ```
//! ````
//!
//! Bodies that already begin with an `@start<type>` directive are kept as-is,
//! everything else is wrapped in `@start<type>` / `@end<type>`.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use regex::Regex;
use tracing::debug;

use crate::consts::DEFAULT_UML_TYPE;

static INFO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^plantuml(?:@(.+))?:([A-Za-z0-9_.\-]+)").unwrap());

static START_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@start[A-Za-z0-9_]+").unwrap());

/// Diagram found in a Markdown fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramFence {
    /// Name from the info string, used as the output file stem.
    pub name: String,
    /// Diagram source including `@start`/`@end` directives.
    pub code: String,
}

/// Parsed `plantuml(@<type>)?:<name>` info string.
#[derive(Debug, PartialEq, Eq)]
struct FenceInfo<'a> {
    uml_type: Option<&'a str>,
    name: &'a str,
}

impl<'a> FenceInfo<'a> {
    /// Parse a fence info string.
    ///
    /// Returns `None` for fences that are not named `PlantUML` diagrams.
    fn parse(info: &'a str) -> Option<Self> {
        let caps = INFO_PATTERN.captures(info)?;
        let name = caps.get(2).map_or("", |m| m.as_str());
        if name.is_empty() {
            return None;
        }
        Some(Self {
            uml_type: caps.get(1).map(|m| m.as_str()),
            name,
        })
    }
}

/// Extract all named `PlantUML` diagrams from a Markdown document.
///
/// Diagrams are returned in document order. Several fences may share a name;
/// all of them are returned.
#[must_use]
pub fn extract_fences(markdown: &str) -> Vec<DiagramFence> {
    let mut fences = Vec::new();
    let mut current: Option<(String, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                current = Some((info.into_string(), String::new()));
            }
            Event::Text(text) => {
                if let Some((_, body)) = current.as_mut() {
                    body.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                let Some((info, body)) = current.take() else {
                    continue;
                };
                let Some(parsed) = FenceInfo::parse(&info) else {
                    continue;
                };
                debug!(name = parsed.name, info = %info, "Found diagram fence");
                fences.push(DiagramFence {
                    name: parsed.name.to_owned(),
                    code: diagram_code(&body, parsed.uml_type),
                });
            }
            _ => {}
        }
    }

    fences
}

/// Build diagram code from a fence body.
///
/// Bodies that start with `@start<word>` are used verbatim. Others are trimmed
/// and wrapped with the declared type, or `uml` when none was given.
fn diagram_code(body: &str, uml_type: Option<&str>) -> String {
    if START_DIRECTIVE.is_match(body) {
        return body.to_owned();
    }
    let t = uml_type.unwrap_or(DEFAULT_UML_TYPE);
    format!("@start{t}\n{}\n@end{t}\n", body.trim())
}
