mod arc;
pub mod bezier;

pub use arc::{Arc, ArcSegment};
pub use bezier::{
    AxisBounds, BezierCurve, BoundingBox, Curvature, CurvePoint, Extrema, OffsetPoint, Projection,
    Split,
};

use crate::error::Result;
use crate::math::{map_range, Point3, Vector3};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }
}

/// Sub-interval of an ancestor curve's parameter space.
///
/// A curve obtained by splitting maps its local `[0, 1]` onto
/// `[start, end]` of the curve it was cut from. `start > end` marks a
/// reversed curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterInterval {
    pub start: f64,
    pub end: f64,
}

impl ParameterInterval {
    /// The whole unit interval.
    pub const UNIT: Self = Self { start: 0.0, end: 1.0 };

    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Maps a local parameter onto the ancestor's parameter space.
    #[must_use]
    pub fn map(&self, t: f64) -> f64 {
        map_range(t, 0.0, 1.0, self.start, self.end)
    }

    /// The sub-interval covering local `[t1, t2]`.
    #[must_use]
    pub fn sub(&self, t1: f64, t2: f64) -> Self {
        Self::new(self.map(t1), self.map(t2))
    }

    #[must_use]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.start + self.end)
    }

    /// Unsigned width of the interval.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.end - self.start).abs()
    }

    /// The same span traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }
}

impl Default for ParameterInterval {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Trait for parametric curves in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Computes the unit tangent vector at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn nested_intervals_compose() {
        let outer = ParameterInterval::new(0.2, 0.6);
        let inner = outer.sub(0.5, 1.0);
        assert_abs_diff_eq!(inner.start, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(inner.end, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(inner.midpoint(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn reversed_interval_maps_backwards() {
        let r = ParameterInterval::new(0.2, 0.6).reversed();
        assert_abs_diff_eq!(r.map(0.0), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(r.map(0.25), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(r.width(), 0.4, epsilon = 1e-12);
    }
}
