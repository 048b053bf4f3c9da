//! The knife: cutting paths along a line.

use std::cmp::Ordering;

use kurbo::Line;

use crate::consts::{COINCIDENT_TOLERANCE, PARAM_EPSILON};
use crate::design_space::DPoint;
use crate::geom::{self, CurveHit};
use crate::outline::Outline;
use crate::path::{Path, Segment};

/// The line being drawn by a knife (or ruler) gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnifeLine {
    start: DPoint,
    current: DPoint,
    axis_locked: bool,
}

/// A place where the knife line crosses a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// The index of the path in the outline.
    pub path: usize,
    /// The index of the segment in the path.
    pub segment: usize,
    /// The parameter on the segment.
    pub t: f64,
    /// The parameter on the knife line.
    pub line_t: f64,
    pub point: DPoint,
}

impl KnifeLine {
    pub fn new(start: DPoint) -> KnifeLine {
        KnifeLine {
            start,
            current: start,
            axis_locked: false,
        }
    }

    pub fn update(&mut self, current: DPoint) {
        self.current = current;
    }

    /// While locked, the line snaps to horizontal or vertical.
    pub fn set_axis_locked(&mut self, locked: bool) {
        self.axis_locked = locked;
    }

    pub fn end(&self) -> DPoint {
        if self.axis_locked {
            self.current.axis_locked_to(self.start)
        } else {
            self.current
        }
    }

    pub fn line(&self) -> Line {
        Line::new(self.start.to_raw(), self.end().to_raw())
    }
}

/// Every place where `line` crosses a path of the outline, in order along
/// the line.
///
/// A crossing through an on-curve point is reported once, not once for
/// each segment that meets there.
pub fn intersections(outline: &Outline, line: Line) -> Vec<Hit> {
    let mut result = Vec::new();
    for (path_idx, path) in outline.paths().iter().enumerate() {
        let mut hits = path_intersections(path, path_idx, line);
        hits.sort_by(by_line_t);
        let mut kept: Vec<Hit> = Vec::with_capacity(hits.len());
        for hit in hits {
            if kept
                .iter()
                .any(|other| other.point.distance(hit.point) < COINCIDENT_TOLERANCE)
            {
                continue;
            }
            kept.push(hit);
        }
        result.extend(kept);
    }
    result.sort_by(by_line_t);
    result
}

fn path_intersections(path: &Path, path_idx: usize, line: Line) -> Vec<Hit> {
    let line_a = DPoint::from_raw(line.p0);
    let line_b = DPoint::from_raw(line.p1);
    let pt = |idx: usize| path.points()[idx].point;

    let mut hits = Vec::new();
    for (seg_idx, seg) in path.segments().enumerate() {
        let seg_hits: Vec<CurveHit> = match seg {
            Segment::Line { start, end } => {
                geom::segment_line_intersection(pt(start), pt(end), line_a, line_b)
                    .into_iter()
                    .collect()
            }
            Segment::Cubic { start, p1, p2, end } => {
                geom::curve_line_intersections(pt(start), pt(p1), pt(p2), pt(end), line_a, line_b)
            }
        };
        hits.extend(seg_hits.into_iter().map(|hit| Hit {
            path: path_idx,
            segment: seg_idx,
            t: hit.t,
            line_t: hit.line_t,
            point: hit.point,
        }));
    }
    hits
}

fn by_line_t(a: &Hit, b: &Hit) -> Ordering {
    a.line_t.partial_cmp(&b.line_t).unwrap_or(Ordering::Equal)
}

/// Insert a new on-curve point at each hit. Returns the number of points
/// inserted.
///
/// Hits are applied from the last segment of each path to the first, and
/// from the end of each segment to its start, so that the hits still to be
/// applied keep pointing at the right segment. Hits that land on an
/// existing on-curve point insert nothing.
pub fn cut(outline: &mut Outline, hits: &[Hit]) -> usize {
    let mut hits = hits.to_vec();
    hits.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then(b.segment.cmp(&a.segment))
            .then(b.t.partial_cmp(&a.t).unwrap_or(Ordering::Equal))
    });

    let mut inserted = 0;
    // the previous split in the same segment, as (path, segment, t)
    let mut last_split: Option<(usize, usize, f64)> = None;
    for hit in hits {
        let path = match outline.path_mut(hit.path) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("knife: {}", e);
                continue;
            }
        };
        let seg = match path.segment(hit.segment) {
            Some(seg) => seg,
            None => {
                log::warn!("knife: no segment {} in path {}", hit.segment, hit.path);
                continue;
            }
        };

        // after a split, the start of the segment covers [0, t] of the original
        let t = match last_split {
            Some((path_idx, seg_idx, prev_t)) if path_idx == hit.path && seg_idx == hit.segment => {
                hit.t / prev_t
            }
            _ => hit.t,
        };
        if t <= PARAM_EPSILON || t >= 1.0 - PARAM_EPSILON {
            continue;
        }

        path.split_segment_at(seg, t);
        last_split = Some((hit.path, hit.segment, hit.t));
        inserted += 1;
    }
    log::debug!("knife inserted {} points", inserted);
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design_space::DVec2;
    use crate::path::tests::{circle, square};
    use approx::assert_abs_diff_eq;

    fn on_curve_count(path: &Path) -> usize {
        path.points().iter().filter(|pt| pt.is_on_curve()).count()
    }

    /// The circle, moved up so that the x axis crosses it between points.
    fn raised_circle() -> Path {
        let mut path = circle();
        path.select_all();
        path.move_selection(DVec2::new(0., 10.)).unwrap();
        path.clear_selection();
        path.take_dirty();
        path
    }

    #[test]
    fn knife_line_axis_lock() {
        let mut knife = KnifeLine::new(DPoint::new(0., 0.));
        knife.update(DPoint::new(10., 3.));
        assert_eq!(knife.line(), Line::new((0., 0.), (10., 3.)));
        knife.set_axis_locked(true);
        assert_eq!(knife.end(), DPoint::new(10., 0.));
        knife.update(DPoint::new(2., -7.));
        assert_eq!(knife.line(), Line::new((0., 0.), (0., -7.)));
    }

    #[test]
    fn cut_circle_across() {
        let mut outline = Outline::from_paths(vec![raised_circle()]);
        let line = Line::new((-150., 0.), (150., 0.));
        let hits = intersections(&outline, line);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].point.x < 0.0 && hits[1].point.x > 0.0);
        assert!(hits[0].line_t < hits[1].line_t);

        let before = outline.paths()[0].clone();
        assert_eq!(cut(&mut outline, &hits), 2);
        let after = &outline.paths()[0];
        assert_eq!(on_curve_count(after), on_curve_count(&before) + 2);
        assert_eq!(after.len(), before.len() + 6);
        assert!(after.is_dirty());
        assert!(after.debug_validate());

        let new_points: Vec<_> = after
            .points()
            .iter()
            .filter(|pt| pt.is_on_curve() && pt.point.y.abs() < 1e-6)
            .collect();
        assert_eq!(new_points.len(), 2);
        assert!(new_points.iter().all(|pt| pt.is_smooth()));
    }

    #[test]
    fn cut_square_with_lines() {
        let mut outline = Outline::from_paths(vec![square()]);
        let hits = intersections(&outline, Line::new((5., -5.), (5., 15.)));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].point, DPoint::new(5., 0.));
        assert_eq!(cut(&mut outline, &hits), 2);
        let path = &outline.paths()[0];
        assert_eq!(path.len(), 6);
        assert!(path.points().iter().all(|pt| !pt.is_smooth()));
    }

    #[test]
    fn two_cuts_in_one_segment() {
        let mut path = Path::new(DPoint::new(0., 0.));
        path.curve_to(
            DPoint::new(0., 100.),
            DPoint::new(100., 100.),
            DPoint::new(100., 0.),
        )
        .unwrap();
        let mut outline = Outline::from_paths(vec![path]);
        let hits = intersections(&outline, Line::new((-10., 50.), (110., 50.)));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|hit| hit.segment == 0));

        assert_eq!(cut(&mut outline, &hits), 2);
        let path = &outline.paths()[0];
        assert_eq!(path.segments().count(), 3);
        for idx in &[3, 6] {
            assert_abs_diff_eq!(path.points()[*idx].point.y, 50., epsilon = 1e-6);
        }
        assert!(path.points()[3].point.x < path.points()[6].point.x);
    }

    #[test]
    fn hits_through_nodes_are_not_doubled() {
        let mut outline = Outline::from_paths(vec![circle()]);
        let hits = intersections(&outline, Line::new((-150., 0.), (150., 0.)));
        assert_eq!(hits.len(), 2);
        assert_eq!(cut(&mut outline, &hits), 0);
        assert!(!outline.is_dirty());
    }

    #[test]
    fn missing_the_outline() {
        let outline = Outline::from_paths(vec![square()]);
        assert!(intersections(&outline, Line::new((20., 20.), (30., 30.))).is_empty());
        assert!(intersections(&outline, Line::new((5., 5.), (5., 5.))).is_empty());
    }
}
