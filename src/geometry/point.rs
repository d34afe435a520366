use crate::math::{Point2, Point3};

/// Dimensionality of a curve, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Two coordinates per point (x, y).
    Planar,
    /// Three coordinates per point (x, y, z).
    Spatial,
}

impl Dimension {
    /// Number of coordinate axes.
    #[must_use]
    pub fn axes(self) -> usize {
        match self {
            Self::Planar => 2,
            Self::Spatial => 3,
        }
    }

    /// Tags an internal point with this dimension, dropping z for planar data.
    #[must_use]
    pub fn wrap(self, p: Point3) -> Point {
        match self {
            Self::Planar => Point::Planar(Point2::new(p.x, p.y)),
            Self::Spatial => Point::Spatial(p),
        }
    }
}

/// A control or sample point tagged by dimensionality.
///
/// Kernel operations branch on the tag; planar points are never assumed to
/// carry a z-coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Point {
    Planar(Point2),
    Spatial(Point3),
}

impl Point {
    /// Creates a planar point.
    #[must_use]
    pub fn planar(x: f64, y: f64) -> Self {
        Self::Planar(Point2::new(x, y))
    }

    /// Creates a spatial point.
    #[must_use]
    pub fn spatial(x: f64, y: f64, z: f64) -> Self {
        Self::Spatial(Point3::new(x, y, z))
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Planar(_) => Dimension::Planar,
            Self::Spatial(_) => Dimension::Spatial,
        }
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        match self {
            Self::Planar(p) => p.x,
            Self::Spatial(p) => p.x,
        }
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        match self {
            Self::Planar(p) => p.y,
            Self::Spatial(p) => p.y,
        }
    }

    /// The z-coordinate, or `None` for planar points.
    #[must_use]
    pub fn z(&self) -> Option<f64> {
        match self {
            Self::Planar(_) => None,
            Self::Spatial(p) => Some(p.z),
        }
    }

    /// Promotes to a 3D point, placing planar points at z = 0.
    #[must_use]
    pub fn to_point3(&self) -> Point3 {
        match self {
            Self::Planar(p) => Point3::new(p.x, p.y, 0.0),
            Self::Spatial(p) => *p,
        }
    }

    /// Returns `true` if every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Planar(p) => p.x.is_finite() && p.y.is_finite(),
            Self::Spatial(p) => p.x.is_finite() && p.y.is_finite() && p.z.is_finite(),
        }
    }
}

impl From<Point2> for Point {
    fn from(p: Point2) -> Self {
        Self::Planar(p)
    }
}

impl From<Point3> for Point {
    fn from(p: Point3) -> Self {
        Self::Spatial(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_has_no_z() {
        let p = Point::planar(1.0, 2.0);
        assert_eq!(p.dimension(), Dimension::Planar);
        assert_eq!(p.z(), None);
        assert_eq!(p.to_point3(), Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn wrap_respects_dimension() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Dimension::Planar.wrap(p), Point::planar(1.0, 2.0));
        assert_eq!(Dimension::Spatial.wrap(p), Point::spatial(1.0, 2.0, 3.0));
        assert_eq!(Dimension::Spatial.axes(), 3);
    }

    #[test]
    fn non_finite_detected() {
        assert!(!Point::spatial(0.0, f64::NAN, 0.0).is_finite());
        assert!(Point::planar(0.0, 1.0).is_finite());
    }
}
