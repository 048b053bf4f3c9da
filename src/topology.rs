//! Breaking paths apart and joining them together.

use crate::consts::COINCIDENT_TOLERANCE;
use crate::error::{EditError, Result};
use crate::path::Path;
use crate::point::PathPoint;

impl Path {
    /// Break this path at the on-curve point `idx`.
    ///
    /// A closed path becomes a single open path that starts and ends at
    /// copies of the point; an open path becomes two paths that share it.
    /// Breaking an open path at one of its ends returns it unchanged.
    pub fn break_at(&self, idx: usize) -> Result<Vec<Path>> {
        self.check_index(idx)?;
        if !self.points()[idx].is_on_curve() {
            return Err(EditError::NotOnCurve(idx));
        }

        let len = self.len();
        if self.is_closed() {
            let mut points: Vec<PathPoint> = (0..=len)
                .map(|offset| self.points()[(idx + offset) % len].detached())
                .collect();
            corner(&mut points[0]);
            if let Some(last) = points.last_mut() {
                corner(last);
            }
            let mut path = Path::from_raw_parts(points, false);
            path.mark_dirty();
            return Ok(vec![path]);
        }

        if idx == 0 || idx == len - 1 {
            return Ok(vec![self.clone()]);
        }

        let detached = |points: &[PathPoint]| -> Vec<PathPoint> {
            points.iter().map(PathPoint::detached).collect()
        };
        let mut head = detached(&self.points()[..=idx]);
        let mut tail = detached(&self.points()[idx..]);
        if let Some(last) = head.last_mut() {
            corner(last);
        }
        corner(&mut tail[0]);

        let mut head = Path::from_raw_parts(head, false);
        let mut tail = Path::from_raw_parts(tail, false);
        head.mark_dirty();
        tail.mark_dirty();
        log::debug!("broke path at {} into {} and {} points", idx, head.len(), tail.len());
        Ok(vec![head, tail])
    }

    /// Reverse the direction of this path.
    ///
    /// A closed path keeps its start point.
    pub fn reverse(&mut self) {
        let last = if self.is_closed() {
            self.len() - 1
        } else {
            self.len()
        };
        self.points_mut()[..last].reverse();
        self.normalize();
        self.mark_dirty();
    }

    /// Close an open path on itself.
    ///
    /// With `merge`, the first point is assumed to duplicate the last, and
    /// is dropped.
    pub(crate) fn close_joined(&mut self, merge: bool) {
        debug_assert!(!self.is_closed());
        if merge && self.len() > 1 {
            let first = self.points_mut().remove(0);
            warn_if_apart(&first, self.points().last());
        }
        self.set_closed(true);
        self.normalize();
        self.mark_dirty();
    }

    /// Append `other` to the end of this path; both must be open.
    ///
    /// With `merge`, the first point of `other` is assumed to duplicate our
    /// last point, and is dropped.
    pub(crate) fn append_path(&mut self, other: Path, merge: bool) {
        debug_assert!(!self.is_closed() && !other.is_closed());
        let mut points = other.into_points().into_iter();
        if merge {
            if let Some(first) = points.next() {
                warn_if_apart(&first, self.points().last());
            }
        }
        self.points_mut().extend(points);
        self.normalize();
        self.mark_dirty();
    }
}

fn corner(point: &mut PathPoint) {
    point.smooth = false;
}

fn warn_if_apart(dropped: &PathPoint, kept: Option<&PathPoint>) {
    if let Some(kept) = kept {
        let dist = dropped.point.distance(kept.point);
        if dist > COINCIDENT_TOLERANCE {
            log::debug!(
                "merging points {:?} and {:?}, {} apart",
                dropped.point,
                kept.point,
                dist
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design_space::DPoint;
    use crate::outline::Outline;
    use crate::path::tests::{circle, line_then_curve, square};
    use crate::point::PointType;

    const K: f64 = 55.228;

    fn signature(path: &Path) -> Vec<(DPoint, PointType)> {
        path.points().iter().map(|pt| (pt.point, pt.typ)).collect()
    }

    #[test]
    fn break_closed_path() {
        let path = circle();
        let pieces = path.break_at(2).unwrap();
        assert_eq!(pieces.len(), 1);
        let open = &pieces[0];
        assert!(!open.is_closed());
        assert_eq!(open.len(), path.len() + 1);
        assert_eq!(open.points()[0].point, DPoint::new(100., 0.));
        assert_eq!(open.points()[0].typ, PointType::Move);
        assert_eq!(open.points()[12].point, DPoint::new(100., 0.));
        assert!(!open.points()[0].smooth);
        assert!(!open.points()[12].smooth);
        assert!(open.debug_validate());
    }

    #[test]
    fn break_open_path() {
        let path = line_then_curve();
        let pieces = path.break_at(1).unwrap();
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].len(), 2);
        assert_eq!(pieces[1].len(), 4);
        assert_eq!(pieces[1].points()[0].point, DPoint::new(100., 0.));
        assert_eq!(pieces[1].points()[0].typ, PointType::Move);

        // breaking at an end changes nothing
        assert_eq!(path.break_at(0).unwrap(), vec![path.clone()]);
        assert_eq!(path.break_at(4).unwrap(), vec![path.clone()]);
    }

    #[test]
    fn break_rejects_bad_points() {
        let path = line_then_curve();
        assert_eq!(path.break_at(2), Err(EditError::NotOnCurve(2)));
        assert_eq!(
            path.break_at(5),
            Err(EditError::PointOutOfRange { index: 5, len: 5 })
        );
    }

    #[test]
    fn break_then_join_open_path() {
        let mut path = line_then_curve();
        path.curve_to(
            DPoint::new(200., 150.),
            DPoint::new(150., 200.),
            DPoint::new(100., 200.),
        )
        .unwrap();
        let mut outline = Outline::from_paths(path.break_at(4).unwrap());
        let joined = outline.join_paths(0, false, 1, true, true).unwrap();
        assert_eq!(joined, 0);
        assert_eq!(outline.len(), 1);
        assert_eq!(signature(&outline.paths()[0]), signature(&path));
    }

    #[test]
    fn break_then_join_closed_path() {
        let path = circle();
        let mut outline = Outline::from_paths(path.break_at(5).unwrap());
        outline.join_paths(0, false, 0, true, true).unwrap();
        let rejoined = &outline.paths()[0];
        assert!(rejoined.is_closed());
        assert_eq!(rejoined.len(), path.len());

        // the same cycle, starting elsewhere
        let original = signature(&path);
        let result = signature(rejoined);
        let shift = original
            .iter()
            .position(|item| *item == result[0])
            .unwrap();
        let mut rotated = original.clone();
        rotated.rotate_left(shift);
        assert_eq!(rotated, result);
    }

    #[test]
    fn join_reverses_to_align() {
        let mut a = Path::new(DPoint::new(0., 0.));
        a.line_to(DPoint::new(10., 0.)).unwrap();
        let mut b = Path::new(DPoint::new(30., 0.));
        b.line_to(DPoint::new(20., 0.)).unwrap();
        let mut outline = Outline::from_paths(vec![a, b]);
        outline.join_paths(0, false, 1, false, false).unwrap();
        let xs: Vec<_> = outline.paths()[0].points().iter().map(|pt| pt.point.x).collect();
        assert_eq!(xs, vec![0., 10., 20., 30.]);

        let mut c = Path::new(DPoint::new(0., 0.));
        c.line_to(DPoint::new(10., 0.)).unwrap();
        outline.add_path(c);
        assert_eq!(
            outline.join_paths(1, true, 0, true, false).unwrap(),
            0
        );
        let xs: Vec<_> = outline.paths()[0].points().iter().map(|pt| pt.point.x).collect();
        assert_eq!(xs, vec![10., 0., 0., 10., 20., 30.]);
    }

    #[test]
    fn join_closed_path_fails() {
        let mut outline = Outline::from_paths(vec![square(), line_then_curve()]);
        assert_eq!(
            outline.join_paths(1, false, 0, true, false),
            Err(EditError::PathNotOpen(0))
        );
        assert!(outline.join_paths(1, false, 7, true, false).is_err());
    }

    #[test]
    fn reverse_keeps_closed_start() {
        let mut path = circle();
        path.reverse();
        assert_eq!(path.points()[11].point, DPoint::new(0., -100.));
        assert_eq!(path.points()[0].point, DPoint::new(-K, -100.));
        assert!(path.debug_validate());

        let mut open = line_then_curve();
        open.reverse();
        assert_eq!(open.points()[0].point, DPoint::new(200., 100.));
        assert_eq!(open.points()[0].typ, PointType::Move);
        assert_eq!(open.points()[3].typ, PointType::Curve);
        assert_eq!(open.points()[4].typ, PointType::Line);
    }
}
