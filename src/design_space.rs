//! 'Design space' is the fixed coordinate space in which we describe glyphs.
//!
//! Points in design space are plain `f64` pairs; for vector math we convert
//! them to their kurbo equivalents and back.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use kurbo::{Point, Vec2};

/// A point in design space.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DPoint {
    pub x: f64,
    pub y: f64,
}

/// A vector in design space, used for nudging & dragging
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DVec2 {
    pub x: f64,
    pub y: f64,
}

impl DPoint {
    pub const ZERO: DPoint = DPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> DPoint {
        DPoint { x, y }
    }

    /// Create a new `DPoint` from a kurbo `Point`, after doing vector math.
    pub fn from_raw(point: impl Into<Point>) -> DPoint {
        let point = point.into();
        DPoint::new(point.x, point.y)
    }

    /// Convert a design point to a kurbo point, for the operations
    /// available there.
    pub fn to_raw(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Convert this `DPoint` to a `DVec2`.
    pub fn to_dvec2(self) -> DVec2 {
        let DPoint { x, y } = self;
        DVec2 { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: DPoint) -> f64 {
        self.to_raw().distance(other.to_raw())
    }

    /// Given another point, lock whichever axis has the smallest difference
    /// between the two points to the value of that point.
    pub fn axis_locked_to(self, other: DPoint) -> DPoint {
        let dxy = other - self;
        if dxy.x.abs() > dxy.y.abs() {
            DPoint::new(self.x, other.y)
        } else {
            DPoint::new(other.x, self.y)
        }
    }

    pub fn lerp(self, other: DPoint, t: f64) -> DPoint {
        DPoint::from_raw(self.to_raw().lerp(other.to_raw(), t))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl DVec2 {
    pub const ZERO: DVec2 = DVec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> DVec2 {
        DVec2 { x, y }
    }

    pub fn from_raw(vec2: impl Into<Vec2>) -> DVec2 {
        let vec2 = vec2.into();
        DVec2::new(vec2.x, vec2.y)
    }

    #[inline]
    pub fn to_raw(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn hypot(self) -> f64 {
        self.to_raw().hypot()
    }

    #[inline]
    pub fn dot(self, other: DVec2) -> f64 {
        self.to_raw().dot(other.to_raw())
    }

    #[inline]
    pub fn cross(self, other: DVec2) -> f64 {
        self.to_raw().cross(other.to_raw())
    }

    /// The angle of this vector, in radians.
    #[inline]
    pub fn atan2(self) -> f64 {
        self.to_raw().atan2()
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// This vector rotated counter-clockwise by `angle` radians.
    pub fn rotated(self, angle: f64) -> DVec2 {
        let (sin, cos) = angle.sin_cos();
        DVec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl Add<DVec2> for DPoint {
    type Output = DPoint;

    #[inline]
    fn add(self, other: DVec2) -> Self {
        DPoint::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign<DVec2> for DPoint {
    #[inline]
    fn add_assign(&mut self, other: DVec2) {
        *self = *self + other
    }
}

impl Sub<DVec2> for DPoint {
    type Output = DPoint;

    #[inline]
    fn sub(self, other: DVec2) -> Self {
        DPoint::new(self.x - other.x, self.y - other.y)
    }
}

impl Sub<DPoint> for DPoint {
    type Output = DVec2;

    #[inline]
    fn sub(self, other: DPoint) -> DVec2 {
        DVec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Add for DVec2 {
    type Output = DVec2;

    #[inline]
    fn add(self, other: DVec2) -> DVec2 {
        DVec2::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for DVec2 {
    fn add_assign(&mut self, rhs: DVec2) {
        *self = *self + rhs
    }
}

impl Sub for DVec2 {
    type Output = DVec2;

    #[inline]
    fn sub(self, other: DVec2) -> DVec2 {
        DVec2::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for DVec2 {
    fn sub_assign(&mut self, rhs: DVec2) {
        *self = *self - rhs
    }
}

impl Mul<f64> for DVec2 {
    type Output = DVec2;

    #[inline]
    fn mul(self, rhs: f64) -> DVec2 {
        DVec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for DVec2 {
    type Output = DVec2;

    #[inline]
    fn neg(self) -> DVec2 {
        DVec2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for DPoint {
    fn from(src: (f64, f64)) -> DPoint {
        DPoint::new(src.0, src.1)
    }
}

impl From<(f64, f64)> for DVec2 {
    fn from(src: (f64, f64)) -> DVec2 {
        DVec2::new(src.0, src.1)
    }
}

impl From<DPoint> for Point {
    fn from(src: DPoint) -> Point {
        src.to_raw()
    }
}

impl fmt::Debug for DPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "D({:?}, {:?})", self.x, self.y)
    }
}

impl fmt::Debug for DVec2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Dv({:?}, {:?})", self.x, self.y)
    }
}

impl fmt::Display for DPoint {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "D(")?;
        fmt::Display::fmt(&self.x, formatter)?;
        write!(formatter, ", ")?;
        fmt::Display::fmt(&self.y, formatter)?;
        write!(formatter, ")")
    }
}

impl fmt::Display for DVec2 {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "Dv(")?;
        fmt::Display::fmt(&self.x, formatter)?;
        write!(formatter, ", ")?;
        fmt::Display::fmt(&self.y, formatter)?;
        write!(formatter, ")")
    }
}
