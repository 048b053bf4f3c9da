//! The ruler: measuring distances along a line.

use kurbo::{Line, ParamCurve};

use crate::consts::MEASURE_FUZZY_TOLERANCE;
use crate::design_space::DPoint;
use crate::outline::Outline;

use super::knife;

/// What the ruler reports for a line dragged across the outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// The ends of the line, and every crossing in between, in order.
    pub points: Vec<DPoint>,
    /// The distances between consecutive `points`.
    pub spans: Vec<f64>,
    /// The direction of the line, in degrees counter-clockwise from the
    /// positive x axis, in `(-90, 270]`.
    pub angle: f64,
}

fn atan_to_angle(atan: f64) -> f64 {
    if !atan.is_finite() {
        return 0.0;
    }
    let mut angle = atan.to_degrees();
    if angle <= -90.0 {
        angle += 360.0;
    }
    angle
}

/// Measure `line` against the outline. Nothing is modified.
#[allow(clippy::float_cmp)]
pub fn measure(outline: &Outline, line: Line) -> Measurement {
    let angle = atan_to_angle((line.p1 - line.p0).atan2());
    let len = line.length();
    if len < MEASURE_FUZZY_TOLERANCE {
        return Measurement {
            points: vec![DPoint::from_raw(line.p0)],
            spans: Vec::new(),
            angle,
        };
    }

    let mut intersections = vec![0.0, 1.0];
    intersections.extend(
        knife::intersections(outline, line)
            .iter()
            .map(|hit| hit.line_t.max(0.0).min(1.0)),
    );
    intersections.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Fuzzy deduplication
    let thresh = MEASURE_FUZZY_TOLERANCE / len;
    let mut result: Vec<f64> = Vec::with_capacity(intersections.len());
    let mut t_cluster_start = -1.0;
    let mut t_last = -1.0;
    for t in intersections {
        if t - t_last > thresh {
            t_cluster_start = t;
            result.push(t);
        } else if let Some(last) = result.last_mut() {
            *last = if t_cluster_start == 0.0 {
                0.0
            } else if t == 1.0 {
                1.0
            } else {
                0.5 * (t_cluster_start + t)
            };
        }
        t_last = t;
    }

    let points: Vec<DPoint> = result
        .iter()
        .map(|t| DPoint::from_raw(line.eval(*t)))
        .collect();
    let spans = points.windows(2).map(|pair| pair[0].distance(pair[1])).collect();
    Measurement {
        points,
        spans,
        angle,
    }
}
