//! encoding and decoding paths for use with the clipboard.

use std::fmt::Write;

use kurbo::{Affine, Shape, Vec2};

use crate::outline::Outline;
use crate::path::{Path, Segment};

/// The selected parts of the outline, as JSON.
///
/// Returns `None` if nothing is selected.
pub fn make_json(outline: &Outline) -> Option<String> {
    let paths = outline.filter_selection(false).paths;
    if paths.is_empty() {
        return None;
    }
    match serde_json::to_string(&paths) {
        Ok(json) => Some(json),
        Err(e) => {
            log::error!("failed to serialize selection: '{}'", e);
            None
        }
    }
}

pub fn from_json(json: &str) -> Option<Vec<Path>> {
    serde_json::from_str(json).ok()
}

/// Generates kurbo drawing code for the selected parts of the outline, if
/// anything is selected.
///
/// Paths are flipped to y-down and moved so their shared bounding box
/// starts at the origin.
pub fn make_code_string(outline: &Outline) -> Option<String> {
    let paths = outline.filter_selection(false).paths;
    let bounds = paths
        .iter()
        .map(|p| p.bezier().bounding_box())
        .reduce(|acc, rect| acc.union(rect))?;

    // the top left corner, once flipped
    let origin = Vec2::new(bounds.x0, -bounds.y1);
    let transform = Affine::translate(-origin) * Affine::FLIP_Y;

    let mut out = String::from("let mut bez = BezPath::new();\n");
    for path in &paths {
        if let Err(e) = append_path(path, transform, &mut out) {
            log::error!("error generating code string: '{}'", e);
            return None;
        }
    }
    Some(out)
}

fn append_path(path: &Path, transform: Affine, out: &mut String) -> std::fmt::Result {
    let pt = |idx: usize| transform * path.points()[idx].to_kurbo();
    out.push('\n');
    let start = transform * path.start_point().to_kurbo();
    writeln!(out, "bez.move_to(({:.1}, {:.1}));", start.x, start.y)?;
    for segment in path.segments() {
        match segment {
            Segment::Line { end, .. } => {
                let p = pt(end);
                writeln!(out, "bez.line_to(({:.1}, {:.1}));", p.x, p.y)?
            }
            Segment::Cubic { p1, p2, end, .. } => {
                let (p1, p2, p3) = (pt(p1), pt(p2), pt(end));
                writeln!(
                    out,
                    "bez.curve_to(({:.1}, {:.1}), ({:.1}, {:.1}), ({:.1}, {:.1}));",
                    p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
                )?
            }
        }
    }
    if path.is_closed() {
        writeln!(out, "bez.close_path();")?;
    }
    Ok(())
}
