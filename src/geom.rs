//! Geometry primitives: projection, intersection and cubic root finding.
//!
//! Degenerate inputs (zero-length lines, parallel lines, curves that lie
//! on the cut line) never produce errors here; they produce `None` or an
//! empty list, and callers are expected to treat that as a normal outcome.

use kurbo::{CubicBez, ParamCurve};

use crate::consts::{PARALLEL_EPSILON, PARAM_EPSILON, ROOT_EPSILON};
use crate::design_space::{DPoint, DVec2};

/// How [`line_projection`] treats a projection that falls outside the
/// segment.
///
/// These are not interchangeable: rejecting disables an operation when the
/// point is beyond the segment, clamping snaps it to the nearest endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionBounds {
    /// Return `None` if `t` is outside `[0, 1]`.
    Reject,
    /// Clamp `t` to `[0, 1]`.
    Clamp,
    /// Project onto the infinite line through the two points.
    Unbounded,
}

/// An intersection between a cut line and a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    pub point: DPoint,
    /// The parameter on the segment.
    pub t: f64,
    /// The parameter on the cut line.
    pub line_t: f64,
}

pub fn distance(p: DPoint, q: DPoint) -> f64 {
    p.distance(q)
}

/// Orthogonal projection of `p` onto the line `a`-`b`.
///
/// Returns the projected point and its parameter along `a`-`b`, or `None`
/// if `a` and `b` coincide (or, with [`ProjectionBounds::Reject`], if the
/// projection is beyond the segment).
pub fn line_projection(
    a: DPoint,
    b: DPoint,
    p: DPoint,
    bounds: ProjectionBounds,
) -> Option<(DPoint, f64)> {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 == 0.0 || !len2.is_finite() {
        return None;
    }
    let mut t = (p - a).dot(ab) / len2;
    match bounds {
        ProjectionBounds::Reject if !(0.0..=1.0).contains(&t) => return None,
        ProjectionBounds::Clamp => t = t.max(0.0).min(1.0),
        _ => (),
    }
    Some((a + ab * t, t))
}

/// Intersection of segments `a`-`b` and `c`-`d`.
pub fn line_intersection(a: DPoint, b: DPoint, c: DPoint, d: DPoint) -> Option<DPoint> {
    line_intersection_params(a, b, c, d).map(|(pt, _, _)| pt)
}

/// Intersection of segments `a`-`b` and `c`-`d`, with the parameter of the
/// intersection along each segment.
pub fn line_intersection_params(
    a: DPoint,
    b: DPoint,
    c: DPoint,
    d: DPoint,
) -> Option<(DPoint, f64, f64)> {
    let r = b - a;
    let s = d - c;
    let det = r.cross(s);
    if det.abs() < PARALLEL_EPSILON || !det.is_finite() {
        return None;
    }
    let ac = c - a;
    let t = ac.cross(s) / det;
    let u = ac.cross(r) / det;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some((a + r * t, t, u))
}

/// The polynomial coefficients `[a, b, c, d]` of a cubic bezier, such that
/// the position at `t` is `a·t³ + b·t² + c·t + d`.
pub fn cubic_parameters(p0: DPoint, p1: DPoint, p2: DPoint, p3: DPoint) -> [DVec2; 4] {
    let c = (p1 - p0) * 3.0;
    let b = (p2 - p1) * 3.0 - c;
    let a = p3 - p0 - c - b;
    [a, b, c, p0.to_dvec2()]
}

pub fn eval_cubic(p0: DPoint, p1: DPoint, p2: DPoint, p3: DPoint, t: f64) -> DPoint {
    let bez = CubicBez::new(p0.to_raw(), p1.to_raw(), p2.to_raw(), p3.to_raw());
    DPoint::from_raw(bez.eval(t))
}

/// Split a cubic at `t` with de Casteljau's algorithm.
pub fn subdivide_cubic(
    p0: DPoint,
    p1: DPoint,
    p2: DPoint,
    p3: DPoint,
    t: f64,
) -> ([DPoint; 4], [DPoint; 4]) {
    let p01 = p0.lerp(p1, t);
    let p12 = p1.lerp(p2, t);
    let p23 = p2.lerp(p3, t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let mid = p012.lerp(p123, t);
    ([p0, p01, p012, mid], [mid, p123, p23, p3])
}

/// Intersections of the cubic `p0..p3` with the segment `line_a`-`line_b`.
///
/// The signed distance of the cubic from the line is itself a cubic
/// in `t`; each of its real roots in `[0, 1]` whose point also lies within
/// the segment is reported. Results are in no particular order.
pub fn curve_line_intersections(
    p0: DPoint,
    p1: DPoint,
    p2: DPoint,
    p3: DPoint,
    line_a: DPoint,
    line_b: DPoint,
) -> Vec<CurveHit> {
    let dir = line_b - line_a;
    let len2 = dir.dot(dir);
    if len2 == 0.0 || !len2.is_finite() {
        return Vec::new();
    }
    let normal = DVec2::new(-dir.y, dir.x);
    let [a, b, c, d] = cubic_parameters(p0, p1, p2, p3);
    let roots = solve_cubic(
        normal.dot(a),
        normal.dot(b),
        normal.dot(c),
        normal.dot(d - line_a.to_dvec2()),
    );

    let mut hits: Vec<CurveHit> = Vec::with_capacity(roots.len());
    for t in roots {
        let t = match clamp_param(t) {
            Some(t) => t,
            None => continue,
        };
        let point = eval_cubic(p0, p1, p2, p3, t);
        if !point.is_finite() {
            continue;
        }
        let line_t = match clamp_param((point - line_a).dot(dir) / len2) {
            Some(line_t) => line_t,
            None => continue,
        };
        if hits.iter().any(|hit| (hit.t - t).abs() < ROOT_EPSILON) {
            continue;
        }
        hits.push(CurveHit { point, t, line_t });
    }
    hits
}

/// Intersection of the straight segment `p0`-`p1` with the cut line
/// `line_a`-`line_b`, in the same form as [`curve_line_intersections`].
pub fn segment_line_intersection(
    p0: DPoint,
    p1: DPoint,
    line_a: DPoint,
    line_b: DPoint,
) -> Option<CurveHit> {
    line_intersection_params(p0, p1, line_a, line_b).map(|(point, t, line_t)| CurveHit {
        point,
        t,
        line_t,
    })
}

fn clamp_param(t: f64) -> Option<f64> {
    if t.is_finite() && t >= -PARAM_EPSILON && t <= 1.0 + PARAM_EPSILON {
        Some(t.max(0.0).min(1.0))
    } else {
        None
    }
}

/// The real roots of `a·t³ + b·t² + c·t + d`.
///
/// The zero polynomial has no (isolated) roots and returns an empty list.
/// Roots are sorted and deduplicated.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs()).max(d.abs());
    if scale == 0.0 || !scale.is_finite() {
        return Vec::new();
    }
    let (a, b, c, d) = (a / scale, b / scale, c / scale, d / scale);

    let mut roots: Vec<f64> = kurbo::common::solve_cubic(d, c, b, a)
        .into_iter()
        .filter(|t| t.is_finite())
        .collect();

    // polish with a couple of newton steps
    for root in roots.iter_mut() {
        for _ in 0..2 {
            let f = ((a * *root + b) * *root + c) * *root + d;
            let df = (3.0 * a * *root + 2.0 * b) * *root + c;
            if df.abs() > ROOT_EPSILON {
                let next = *root - f / df;
                if next.is_finite() {
                    *root = next;
                }
            }
        }
    }

    roots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    roots.dedup_by(|a, b| (*a - *b).abs() < ROOT_EPSILON);
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pt(x: f64, y: f64) -> DPoint {
        DPoint::new(x, y)
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        assert_eq!(
            line_intersection(pt(0., 0.), pt(1., 0.), pt(0., 1.), pt(1., 1.)),
            None
        );
    }

    #[test]
    fn crossing_lines() {
        assert_eq!(
            line_intersection(pt(0., 0.), pt(2., 2.), pt(0., 2.), pt(2., 0.)),
            Some(pt(1., 1.))
        );
        let (_, t, u) =
            line_intersection_params(pt(0., 0.), pt(4., 0.), pt(1., -1.), pt(1., 3.)).unwrap();
        assert_abs_diff_eq!(t, 0.25);
        assert_abs_diff_eq!(u, 0.25);
    }

    #[test]
    fn lines_intersecting_beyond_segment() {
        assert_eq!(
            line_intersection(pt(0., 0.), pt(1., 1.), pt(0., 4.), pt(4., 0.)),
            None
        );
    }

    #[test]
    fn projection_bounds() {
        let a = pt(0., 0.);
        let b = pt(10., 0.);
        let (proj, t) = line_projection(a, b, pt(4., 7.), ProjectionBounds::Reject).unwrap();
        assert_eq!(proj, pt(4., 0.));
        assert_abs_diff_eq!(t, 0.4);

        let beyond = pt(15., 3.);
        assert!(line_projection(a, b, beyond, ProjectionBounds::Reject).is_none());
        assert_eq!(
            line_projection(a, b, beyond, ProjectionBounds::Clamp),
            Some((b, 1.0))
        );
        assert_eq!(
            line_projection(a, b, beyond, ProjectionBounds::Unbounded),
            Some((pt(15., 0.), 1.5))
        );
        // degenerate line
        assert!(line_projection(a, a, beyond, ProjectionBounds::Unbounded).is_none());
        assert_eq!(distance(a, pt(3., 4.)), 5.0);
    }

    #[test]
    fn cubic_parameters_match_evaluation() {
        let (p0, p1, p2, p3) = (pt(0., 0.), pt(10., 40.), pt(50., 30.), pt(60., 0.));
        let [a, b, c, d] = cubic_parameters(p0, p1, p2, p3);
        for &t in &[0.0, 0.25, 0.3, 0.8, 1.0] {
            let poly = a * (t * t * t) + b * (t * t) + c * t + d;
            let expected = eval_cubic(p0, p1, p2, p3, t);
            assert_abs_diff_eq!(poly.x, expected.x, epsilon = 1e-9);
            assert_abs_diff_eq!(poly.y, expected.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn cubic_roots() {
        // (t - 0.2)(t - 0.5)(t - 0.8)
        let roots = solve_cubic(1.0, -1.5, 0.66, -0.08);
        assert_eq!(roots.len(), 3);
        assert_abs_diff_eq!(roots[0], 0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(roots[1], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(roots[2], 0.8, epsilon = 1e-9);

        // t³ - 8, one real root
        let roots = solve_cubic(1.0, 0.0, 0.0, -8.0);
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], 2.0, epsilon = 1e-9);

        // degenerates to quadratic and linear
        let roots = solve_cubic(0.0, 1.0, -3.0, 2.0);
        assert_eq!(roots.len(), 2);
        assert_abs_diff_eq!(roots[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(roots[1], 2.0, epsilon = 1e-9);
        assert_eq!(solve_cubic(0.0, 0.0, 2.0, -1.0), vec![0.5]);

        assert!(solve_cubic(0.0, 0.0, 0.0, 0.0).is_empty());
        assert!(solve_cubic(0.0, 0.0, 0.0, 3.0).is_empty());
    }

    #[test]
    fn nearly_quadratic_cubic_roots() {
        // (t - 0.5)(t - 1) with a trace of a cubic term
        for &a in &[1e-8, 2e-9] {
            let roots = solve_cubic(a, 1.0, -1.5, 0.5);
            for expected in &[0.5, 1.0] {
                assert!(
                    roots.iter().any(|t| (t - expected).abs() < 1e-6),
                    "{} missing from {:?}",
                    expected,
                    roots
                );
            }
        }
    }

    #[test]
    fn raised_quadratic_arch_crossed_twice() {
        // a degree-raised quadratic, with its second handle drifted slightly
        for &drift in &[1e-7, 3e-7, 1e-6] {
            let hits = curve_line_intersections(
                pt(0., 0.),
                pt(100. / 3., 200. / 3.),
                pt(200. / 3., 200. / 3. + drift),
                pt(100., 0.),
                pt(-10., 25.),
                pt(110., 25.),
            );
            assert_eq!(hits.len(), 2, "drift {}", drift);
            for hit in &hits {
                assert_abs_diff_eq!(hit.point.y, 25.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn collinear_cubic_crossing_line() {
        let hits = curve_line_intersections(
            pt(0., 0.),
            pt(1., 0.),
            pt(2., 0.),
            pt(3., 0.),
            pt(1.5, -1.),
            pt(1.5, 1.),
        );
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].point.x, 1.5, epsilon = 1e-9);
        assert_abs_diff_eq!(hits[0].point.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hits[0].t, 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(hits[0].line_t, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn cubic_lying_on_line_is_degenerate() {
        let hits = curve_line_intersections(
            pt(0., 0.),
            pt(1., 0.),
            pt(2., 0.),
            pt(3., 0.),
            pt(-1., 0.),
            pt(5., 0.),
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn arch_crossed_twice() {
        let (p0, p1, p2, p3) = (pt(0., 0.), pt(0., 100.), pt(100., 100.), pt(100., 0.));
        let mut hits = curve_line_intersections(p0, p1, p2, p3, pt(-10., 50.), pt(110., 50.));
        assert_eq!(hits.len(), 2);
        hits.sort_by(|a, b| a.line_t.partial_cmp(&b.line_t).unwrap());
        for hit in &hits {
            assert_abs_diff_eq!(hit.point.y, 50.0, epsilon = 1e-6);
            let on_curve = eval_cubic(p0, p1, p2, p3, hit.t);
            assert_abs_diff_eq!(on_curve.x, hit.point.x, epsilon = 1e-9);
        }
        assert!(hits[0].point.x < hits[1].point.x);
        // symmetric curve, symmetric hits
        assert_abs_diff_eq!(hits[0].t + hits[1].t, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn line_too_short_to_reach() {
        let hits = curve_line_intersections(
            pt(0., 0.),
            pt(0., 100.),
            pt(100., 100.),
            pt(100., 0.),
            pt(40., 0.),
            pt(40., 10.),
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn subdivision_meets_curve() {
        let (p0, p1, p2, p3) = (pt(0., 0.), pt(10., 40.), pt(50., 30.), pt(60., 0.));
        let (left, right) = subdivide_cubic(p0, p1, p2, p3, 0.3);
        let mid = eval_cubic(p0, p1, p2, p3, 0.3);
        assert_abs_diff_eq!(left[3].x, mid.x, epsilon = 1e-9);
        assert_abs_diff_eq!(left[3].y, mid.y, epsilon = 1e-9);
        assert_eq!(left[3], right[0]);
        assert_eq!(left[0], p0);
        assert_eq!(right[3], p3);
        // a point on the right half is on the original curve
        let orig = eval_cubic(p0, p1, p2, p3, 0.3 + 0.7 * 0.5);
        let half = eval_cubic(right[0], right[1], right[2], right[3], 0.5);
        assert_abs_diff_eq!(orig.x, half.x, epsilon = 1e-9);
        assert_abs_diff_eq!(orig.y, half.y, epsilon = 1e-9);
    }
}
