//! Errors for operations that would otherwise corrupt a path.

/// An error raised when an edit is asked to do something the outline's
/// topology does not allow.
///
/// Geometric dead ends (parallel lines, no roots in range) are not errors;
/// they are reported as empty results by the functions in [`geom`].
///
/// [`geom`]: crate::geom
#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    /// A point index was not valid for the path.
    PointOutOfRange { index: usize, len: usize },
    /// A path index was not valid for the outline.
    PathOutOfRange { index: usize, len: usize },
    /// The operation needs an on-curve point, and was given an off-curve.
    NotOnCurve(usize),
    /// An off-curve point had no unique on-curve neighbour.
    MissingAnchor(usize),
    /// The operation needs an open path.
    PathNotOpen(usize),
    /// A path had no points.
    EmptyPath,
    /// Source data used a point type we do not support.
    UnsupportedPointType(&'static str),
    /// Source data did not describe a valid path.
    InvalidPath(String),
    /// A move policy name we do not recognize.
    UnknownPolicy(String),
}

pub type Result<T> = std::result::Result<T, EditError>;

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::PointOutOfRange { index, len } => {
                write!(f, "point index {} out of range for path of {} points", index, len)
            }
            Self::PathOutOfRange { index, len } => {
                write!(f, "path index {} out of range for outline of {} paths", index, len)
            }
            Self::NotOnCurve(idx) => write!(f, "point {} is not an on-curve point", idx),
            Self::MissingAnchor(idx) => {
                write!(f, "off-curve point {} has no unique on-curve neighbour", idx)
            }
            Self::PathNotOpen(idx) => write!(f, "path {} is closed", idx),
            Self::EmptyPath => write!(f, "path has no points"),
            Self::UnsupportedPointType(typ) => write!(f, "unsupported point type '{}'", typ),
            Self::InvalidPath(msg) => write!(f, "invalid path: {}", msg),
            Self::UnknownPolicy(name) => write!(f, "unknown move policy '{}'", name),
        }
    }
}

impl std::error::Error for EditError {}
