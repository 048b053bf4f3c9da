//! A single contour, and the segments it is made of.

use kurbo::{BezPath, CubicBez, Line, PathEl, PathSeg};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::consts::TANGENT_ANGLE_TOLERANCE;
use crate::design_space::DPoint;
use crate::error::{EditError, Result};
use crate::geom;
use crate::point::{PathPoint, PointType};

/// A single bezier path.
///
/// This does not contain subpaths, but a glyph can contain multiple paths.
/// UFO calls this a [contour][].
///
/// # Notes
///
/// The points of a closed path are a cycle. We adopt the convention that a
/// closed path always *ends* with an on-curve point, so that no segment's
/// control points wrap around the end of the vec; the first segment of a
/// closed path runs from the last point to the first on-curve point.
///
/// A path that is 'open' must both begin and end with on-curve points, and
/// its first point is always a [`PointType::Move`].
///
/// [contour]: https://unifiedfontobject.org/versions/ufo3/glyphs/glif/#contour
#[derive(Clone)]
pub struct Path {
    points: Vec<PathPoint>,
    closed: bool,
    dirty: bool,
}

/// A segment of a path, as indices into the path's points.
///
/// Segments own nothing; they are only valid until the path is next
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Line {
        start: usize,
        end: usize,
    },
    Cubic {
        start: usize,
        p1: usize,
        p2: usize,
        end: usize,
    },
}

/// An iterator over the segments in a path.
pub struct Segments<'a> {
    points: &'a [PathPoint],
    prev_on_curve: usize,
    idx: usize,
}

impl Path {
    /// A new open path, containing a single point.
    pub fn new(start: DPoint) -> Path {
        Path::from_raw_parts(vec![PathPoint::on_curve(start)], false)
    }

    /// Construct a path from points, validating them.
    ///
    /// On-curve point types are derived from the topology; a closed path is
    /// rotated if needed so that it ends with an on-curve point.
    pub fn from_points(points: Vec<PathPoint>, closed: bool) -> Result<Path> {
        if points.is_empty() {
            return Err(EditError::EmptyPath);
        }
        if !closed {
            let first_on = points.first().map(PathPoint::is_on_curve).unwrap_or(false);
            let last_on = points.last().map(PathPoint::is_on_curve).unwrap_or(false);
            if !first_on || !last_on {
                return Err(EditError::InvalidPath(
                    "open path must begin and end on-curve".into(),
                ));
            }
        }
        let mut path = Path {
            points,
            closed,
            dirty: false,
        };
        path.normalize();
        if !path.debug_validate() {
            return Err(EditError::InvalidPath(format!("{:?}", path)));
        }
        Ok(path)
    }

    /// Construct a path from points we built ourselves, and know to be valid.
    pub(crate) fn from_raw_parts(points: Vec<PathPoint>, closed: bool) -> Path {
        let mut path = Path {
            points,
            closed,
            dirty: false,
        };
        path.normalize();
        debug_assert!(path.debug_validate(), "constructed invalid path: {:?}", path);
        path
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Paths are never constructed empty; this exists for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn point(&self, idx: usize) -> Option<&PathPoint> {
        self.points.get(idx)
    }

    pub(crate) fn points_mut(&mut self) -> &mut Vec<PathPoint> {
        &mut self.points
    }

    pub(crate) fn into_points(self) -> Vec<PathPoint> {
        self.points
    }

    pub(crate) fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub(crate) fn check_index(&self, idx: usize) -> Result<()> {
        if idx < self.points.len() {
            Ok(())
        } else {
            Err(EditError::PointOutOfRange {
                index: idx,
                len: self.points.len(),
            })
        }
    }

    /// The index before `idx`, wrapping if the path is closed.
    pub fn prev_idx(&self, idx: usize) -> Option<usize> {
        if self.closed {
            Some((self.len() + idx - 1) % self.len())
        } else {
            idx.checked_sub(1)
        }
    }

    /// The index after `idx`, wrapping if the path is closed.
    pub fn next_idx(&self, idx: usize) -> Option<usize> {
        if self.closed {
            Some((idx + 1) % self.len())
        } else if idx + 1 < self.len() {
            Some(idx + 1)
        } else {
            None
        }
    }

    /// The point `steps` away from `idx`, forwards or backwards.
    pub(crate) fn step_idx(&self, idx: usize, forward: bool, steps: usize) -> Option<usize> {
        let mut idx = idx;
        for _ in 0..steps {
            idx = if forward {
                self.next_idx(idx)?
            } else {
                self.prev_idx(idx)?
            };
        }
        Some(idx)
    }

    /// The point where drawing this path begins.
    pub fn start_point(&self) -> &PathPoint {
        let idx = if self.closed { self.len() - 1 } else { 0 };
        &self.points[idx]
    }

    pub fn segments(&self) -> Segments {
        // a closed path with a single point has no segments
        let (prev_on_curve, idx) = if self.closed && self.len() > 1 {
            (self.len() - 1, 0)
        } else {
            (0, 1)
        };
        Segments {
            points: &self.points,
            prev_on_curve,
            idx,
        }
    }

    pub fn segment(&self, idx: usize) -> Option<Segment> {
        self.segments().nth(idx)
    }

    /// The kurbo representation of a segment of this path.
    pub fn segment_to_kurbo(&self, seg: Segment) -> PathSeg {
        match seg {
            Segment::Line { start, end } => PathSeg::Line(Line::new(
                self.points[start].to_kurbo(),
                self.points[end].to_kurbo(),
            )),
            Segment::Cubic { start, p1, p2, end } => PathSeg::Cubic(CubicBez::new(
                self.points[start].to_kurbo(),
                self.points[p1].to_kurbo(),
                self.points[p2].to_kurbo(),
                self.points[end].to_kurbo(),
            )),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the path was dirty, and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn has_selection(&self) -> bool {
        self.points.iter().any(|pt| pt.selected)
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, pt)| pt.selected)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn select(&mut self, idx: usize, selected: bool) -> Result<()> {
        self.check_index(idx)?;
        self.points[idx].selected = selected;
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.points.iter_mut().for_each(|pt| pt.selected = true);
    }

    pub fn clear_selection(&mut self) {
        self.points.iter_mut().for_each(|pt| pt.selected = false);
    }

    /// Add a new line segment at the end of the path.
    ///
    /// This is called when the user clicks with the pen tool.
    pub fn line_to(&mut self, point: DPoint) -> Result<usize> {
        self.check_open()?;
        self.points.push(PathPoint::on_curve(point));
        self.normalize();
        self.mark_dirty();
        Ok(self.len() - 1)
    }

    /// Add a new cubic segment at the end of the path.
    pub fn curve_to(&mut self, p1: DPoint, p2: DPoint, p3: DPoint) -> Result<usize> {
        self.check_open()?;
        self.points.push(PathPoint::off_curve(p1));
        self.points.push(PathPoint::off_curve(p2));
        self.points.push(PathPoint::on_curve(p3));
        self.normalize();
        self.mark_dirty();
        Ok(self.len() - 1)
    }

    /// Close an open path with a line from its last point to its first.
    pub fn close(&mut self) -> Result<()> {
        self.check_open()?;
        self.closed = true;
        self.normalize();
        self.mark_dirty();
        Ok(())
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            Err(EditError::InvalidPath("path is already closed".into()))
        } else {
            Ok(())
        }
    }

    /// Insert a new on-curve point at `t` on the given segment.
    ///
    /// Cubic segments are subdivided, and the new point is smooth; lines get
    /// a corner point. Returns the index of the new point.
    pub fn split_segment_at(&mut self, seg: Segment, t: f64) -> usize {
        let new_idx = match seg {
            Segment::Line { start, end } => {
                let point = self.points[start].point.lerp(self.points[end].point, t);
                self.points.insert(end, PathPoint::on_curve(point));
                end
            }
            Segment::Cubic { start, p1, p2, end } => {
                let (left, right) = geom::subdivide_cubic(
                    self.points[start].point,
                    self.points[p1].point,
                    self.points[p2].point,
                    self.points[end].point,
                    t,
                );
                let new_points = vec![
                    PathPoint::off_curve(left[1]),
                    PathPoint::off_curve(left[2]),
                    PathPoint::smooth(left[3]),
                    PathPoint::off_curve(right[1]),
                    PathPoint::off_curve(right[2]),
                ];
                self.points.splice(p1..=p2, new_points);
                p1 + 2
            }
        };
        self.normalize();
        debug_assert!(self.debug_validate(), "{:?}", self);
        self.mark_dirty();
        new_idx
    }

    /// Upgrade a line segment to a cubic bezier.
    pub fn upgrade_line_segment(&mut self, seg: Segment) {
        if let Segment::Line { start, end } = seg {
            let p0 = self.points[start].point;
            let p3 = self.points[end].point;
            let p1 = PathPoint::off_curve(p0.lerp(p3, 1.0 / 3.0));
            let p2 = PathPoint::off_curve(p0.lerp(p3, 2.0 / 3.0));
            self.points.splice(end..end, vec![p1, p2]);
            self.normalize();
            self.mark_dirty();
        }
    }

    /// Toggle an on-curve point between smooth and corner.
    ///
    /// Points without an adjacent control point can only become corners.
    pub fn toggle_point_type(&mut self, idx: usize) -> Result<()> {
        self.check_index(idx)?;
        let has_ctrl = [self.prev_idx(idx), self.next_idx(idx)]
            .iter()
            .flatten()
            .any(|i| self.points[*i].is_off_curve());
        let pt = &mut self.points[idx];
        if !pt.is_on_curve() {
            return Err(EditError::NotOnCurve(idx));
        }
        if pt.is_smooth() || has_ctrl {
            pt.toggle_smooth();
            self.mark_dirty();
        }
        Ok(())
    }

    /// Normalize our representation, such as after inserting or deleting
    /// points.
    ///
    /// This ensures that a closed path always ends with an on-curve, and
    /// that on-curve point types match the segments they close.
    pub(crate) fn normalize(&mut self) {
        if self.closed {
            let to_rotate = self
                .points
                .iter()
                .rev()
                .take_while(|pp| pp.is_off_curve())
                .count();
            if to_rotate < self.points.len() {
                self.points.rotate_right(to_rotate);
            }
        }

        let len = self.points.len();
        for idx in 0..len {
            if self.points[idx].is_off_curve() {
                continue;
            }
            let typ = if !self.closed && idx == 0 {
                PointType::Move
            } else {
                let prev = if idx == 0 { len - 1 } else { idx - 1 };
                if self.points[prev].is_off_curve() {
                    PointType::Curve
                } else {
                    PointType::Line
                }
            };
            self.points[idx].typ = typ;
        }
    }

    /// Check if our internal structure is consistent.
    pub(crate) fn debug_validate(&self) -> bool {
        let points = &self.points;
        if points.is_empty() || !points.iter().any(PathPoint::is_on_curve) {
            return false;
        }
        if points.last().map(PathPoint::is_off_curve).unwrap_or(true) {
            return false;
        }
        if !self.closed && points[0].typ != PointType::Move {
            return false;
        }

        // every run of off-curve points is exactly two long
        let mut run = 0;
        for pt in points {
            if pt.is_off_curve() {
                run += 1;
            } else {
                if run != 0 && run != 2 {
                    return false;
                }
                run = 0;
            }
        }
        true
    }

    pub fn append_to_bezier(&self, bez: &mut BezPath) {
        bez.move_to(self.start_point().to_kurbo());
        for segment in self.segments() {
            match segment {
                Segment::Line { end, .. } => bez.line_to(self.points[end].to_kurbo()),
                Segment::Cubic { p1, p2, end, .. } => bez.curve_to(
                    self.points[p1].to_kurbo(),
                    self.points[p2].to_kurbo(),
                    self.points[end].to_kurbo(),
                ),
            }
        }
        if self.closed {
            bez.close_path();
        }
    }

    pub fn bezier(&self) -> BezPath {
        let mut bez = BezPath::new();
        self.append_to_bezier(&mut bez);
        bez
    }

    /// Attempt to create a `Path` from a BezPath.
    ///
    /// - only the first subpath of the bezier will be used.
    /// - we don't currently support quadratics.
    pub fn from_bezpath(path: impl IntoIterator<Item = PathEl>) -> Result<Path> {
        let mut els = path.into_iter();
        let mut points = Vec::new();
        let mut explicit_close = false;

        let start_point = match els.next() {
            Some(PathEl::MoveTo(pt)) => pt,
            _ => return Err(EditError::InvalidPath("missing initial moveto".into())),
        };

        points.push(PathPoint::on_curve(DPoint::from_raw(start_point)));

        for el in els {
            match el {
                // we only take the first path segment
                PathEl::MoveTo(_) => break,
                PathEl::LineTo(pt) => points.push(PathPoint::on_curve(DPoint::from_raw(pt))),
                PathEl::CurveTo(p0, p1, p2) => {
                    points.push(PathPoint::off_curve(DPoint::from_raw(p0)));
                    points.push(PathPoint::off_curve(DPoint::from_raw(p1)));
                    points.push(PathPoint::on_curve(DPoint::from_raw(p2)));
                }
                PathEl::QuadTo(..) => return Err(EditError::UnsupportedPointType("qcurve")),
                PathEl::ClosePath => {
                    explicit_close = true;
                    break;
                }
            }
        }

        let closed = if points.len() > 1
            && points.first().map(|p| p.point) == points.last().map(|p| p.point)
        {
            points.pop();
            true
        } else {
            explicit_close
        };

        mark_tangent_handles(&mut points, closed);
        Path::from_points(points, closed)
    }

    pub fn from_norad(src: &norad::Contour) -> Result<Path> {
        let first = src.points.first().ok_or(EditError::EmptyPath)?;
        let closed = !matches!(first.typ, norad::PointType::Move);
        let points = src
            .points
            .iter()
            .map(PathPoint::from_norad)
            .collect::<Result<Vec<_>>>()?;
        Path::from_points(points, closed)
    }

    pub fn to_norad(&self) -> norad::Contour {
        let points = self.points.iter().map(PathPoint::to_norad).collect();
        norad::Contour::new(points, None)
    }
}

/// Walk the points in a list and mark those that look like tangent points
/// as being smooth.
pub(crate) fn mark_tangent_handles(points: &mut [PathPoint], closed: bool) {
    let len = points.len();
    if len < 3 {
        return;
    }

    for idx in 0..len {
        if !points[idx].is_on_curve() {
            continue;
        }
        if !closed && (idx == 0 || idx == len - 1) {
            continue;
        }
        let prev = &points[(idx + len - 1) % len];
        let next = &points[(idx + 1) % len];
        if prev.is_on_curve() || next.is_on_curve() {
            continue;
        }
        let incoming = points[idx].point - prev.point;
        let outgoing = next.point - points[idx].point;
        if incoming.is_zero() || outgoing.is_zero() {
            continue;
        }
        let delta_angle = incoming.cross(outgoing).atan2(incoming.dot(outgoing)).abs();
        if delta_angle <= TANGENT_ANGLE_TOLERANCE {
            points[idx].smooth = true;
        }
    }
}

impl Segment {
    pub fn start(&self) -> usize {
        match self {
            Segment::Line { start, .. } | Segment::Cubic { start, .. } => *start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            Segment::Line { end, .. } | Segment::Cubic { end, .. } => *end,
        }
    }

    pub fn is_cubic(&self) -> bool {
        matches!(self, Segment::Cubic { .. })
    }

    /// The indices of the points that belong to this segment: its control
    /// points, if any, and its end point.
    pub fn run(&self) -> Vec<usize> {
        match *self {
            Segment::Line { end, .. } => vec![end],
            Segment::Cubic { p1, p2, end, .. } => vec![p1, p2, end],
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let start = self.prev_on_curve;
        let first = self.points.get(self.idx)?;
        let seg = if first.is_on_curve() {
            Segment::Line {
                start,
                end: self.idx,
            }
        } else {
            let end = self.idx + 2;
            match self.points.get(end) {
                Some(pt) if pt.is_on_curve() => (),
                _ => {
                    log::warn!("malformed cubic segment at {}", self.idx);
                    return None;
                }
            }
            Segment::Cubic {
                start,
                p1: self.idx,
                p2: self.idx + 1,
                end,
            }
        };
        self.prev_on_curve = seg.end();
        self.idx = seg.end() + 1;
        Some(seg)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Path) -> bool {
        self.closed == other.closed && self.points == other.points
    }
}

#[derive(Serialize, Deserialize)]
struct SerializedPoints {
    points: Vec<PathPoint>,
    closed: bool,
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let points = SerializedPoints {
            points: self.points.iter().map(PathPoint::detached).collect(),
            closed: self.closed,
        };
        points.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Path, D::Error>
    where
        D: Deserializer<'de>,
    {
        let SerializedPoints { points, closed } = Deserialize::deserialize(deserializer)?;
        Path::from_points(points, closed).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let closed = if self.closed { "Closed" } else { "Open" };
        writeln!(f, "Path ({}):", closed)?;
        for pt in &self.points {
            writeln!(f, "\t{:?}", pt)?;
        }
        Ok(())
    }
}
