//! Points on a path.

use kurbo::Point;
use norad::PointType as NoradPointType;

use crate::design_space::{DPoint, DVec2};
use crate::error::{EditError, Result};

/// The role a point plays in its path.
///
/// On-curve points close a segment, and their type names that segment;
/// off-curve points are cubic control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointType {
    /// The first point of an open path.
    Move,
    Line,
    Curve,
    OffCurve,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub point: DPoint,
    pub typ: PointType,
    /// Only meaningful for on-curve points; the tangents on either side of
    /// a smooth point are kept collinear.
    #[serde(default)]
    pub smooth: bool,
    #[serde(skip)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PointType {
    pub fn is_on_curve(self) -> bool {
        !self.is_off_curve()
    }

    pub fn is_off_curve(self) -> bool {
        matches!(self, PointType::OffCurve)
    }

    pub fn from_norad(norad_type: &NoradPointType) -> Result<Self> {
        match norad_type {
            NoradPointType::Move => Ok(PointType::Move),
            NoradPointType::Line => Ok(PointType::Line),
            NoradPointType::Curve => Ok(PointType::Curve),
            NoradPointType::OffCurve => Ok(PointType::OffCurve),
            NoradPointType::QCurve => Err(EditError::UnsupportedPointType("qcurve")),
        }
    }

    pub fn to_norad(self) -> NoradPointType {
        match self {
            PointType::Move => NoradPointType::Move,
            PointType::Line => NoradPointType::Line,
            PointType::Curve => NoradPointType::Curve,
            PointType::OffCurve => NoradPointType::OffCurve,
        }
    }
}

impl PathPoint {
    pub fn new(point: DPoint, typ: PointType) -> PathPoint {
        PathPoint {
            point,
            typ,
            smooth: false,
            selected: false,
            name: None,
        }
    }

    /// A corner on-curve point; its exact type is fixed up when it is
    /// placed in a path.
    pub fn on_curve(point: DPoint) -> PathPoint {
        PathPoint::new(point, PointType::Line)
    }

    pub fn smooth(point: DPoint) -> PathPoint {
        PathPoint {
            smooth: true,
            ..PathPoint::on_curve(point)
        }
    }

    pub fn off_curve(point: DPoint) -> PathPoint {
        PathPoint::new(point, PointType::OffCurve)
    }

    pub fn is_on_curve(&self) -> bool {
        self.typ.is_on_curve()
    }

    pub fn is_off_curve(&self) -> bool {
        self.typ.is_off_curve()
    }

    /// `true` for on-curve points marked smooth; off-curves are never smooth.
    pub fn is_smooth(&self) -> bool {
        self.smooth && self.is_on_curve()
    }

    /// Toggle smooth to corner.
    pub fn toggle_smooth(&mut self) {
        if self.is_on_curve() {
            self.smooth = !self.smooth;
        }
    }

    /// A copy of this point, with selection cleared.
    pub(crate) fn detached(&self) -> PathPoint {
        PathPoint {
            selected: false,
            ..self.clone()
        }
    }

    pub fn translate(&mut self, delta: DVec2) {
        self.point += delta;
    }

    pub fn to_kurbo(&self) -> Point {
        self.point.to_raw()
    }

    pub fn from_norad(src: &norad::ContourPoint) -> Result<PathPoint> {
        Ok(PathPoint {
            point: DPoint::new(src.x, src.y),
            typ: PointType::from_norad(&src.typ)?,
            smooth: src.smooth,
            selected: false,
            name: src.name.as_ref().map(|name| name.to_string()),
        })
    }

    pub fn to_norad(&self) -> norad::ContourPoint {
        let name = self
            .name
            .as_deref()
            .and_then(|name| norad::Name::new(name).ok());
        norad::ContourPoint::new(
            self.point.x,
            self.point.y,
            self.typ.to_norad(),
            self.is_smooth(),
            name,
            None,
        )
    }
}

impl std::fmt::Debug for PathPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let smooth = if self.is_smooth() { " smooth" } else { "" };
        let selected = if self.selected { " *" } else { "" };
        write!(f, "{:?} {:?}{}{}", self.point, self.typ, smooth, selected)
    }
}
