//! shared constants

/// Below this magnitude the determinant of a line/line system is treated
/// as zero, and the lines as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-20;

/// Tolerance used when solving polynomials and classifying their roots.
pub const ROOT_EPSILON: f64 = 1e-9;

/// How far outside `[0, 1]` a root may fall and still be clamped onto the
/// segment, to absorb rounding at segment endpoints.
pub const PARAM_EPSILON: f64 = 1e-9;

/// Rounding allowed when deciding which side of a smooth point a handle
/// lies on, and when checking that smooth handles are collinear.
pub const SMOOTH_TOLERANCE: f64 = 1e-6;

/// If the angle between the control points and the on-curve point are
/// within ~a degree of each other, consider it a tangent point.
pub const TANGENT_ANGLE_TOLERANCE: f64 = 0.018;

/// Handles shorter than this are considered degenerate.
pub const MIN_HANDLE_LENGTH: f64 = 1e-12;

/// The ruler doesn't report spans smaller than this, in design units.
pub const MEASURE_FUZZY_TOLERANCE: f64 = 0.1;

/// Distance below which two points are considered to be in the same place,
/// when deciding whether a join is merging a duplicated point.
pub const COINCIDENT_TOLERANCE: f64 = 1e-6;
