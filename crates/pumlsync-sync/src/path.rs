//! Output path computation.

use pumlsync_diagrams::DiagramSource;

/// Repository path of the SVG generated for `source`.
///
/// With no output directory (or `.`) the SVG is written next to its source,
/// otherwise into `output_dir`. `.` and empty segments are dropped, so the
/// result never starts with `./` or `/`.
#[must_use]
pub fn output_path(source: &DiagramSource, output_dir: Option<&str>) -> String {
    let dir = match output_dir.map(str::trim) {
        Some(dir) if !dir.is_empty() && dir != "." => dir,
        _ => source.dir.as_str(),
    };
    let file_name = format!("{}.svg", source.name);

    dir.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .chain(std::iter::once(file_name.as_str()))
        .collect::<Vec<_>>()
        .join("/")
}
