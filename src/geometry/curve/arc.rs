use crate::error::{BezelError, Result};
use crate::math::arc_2d::{point_on_circle, CircleFit};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain, ParameterInterval};

/// A circular arc in the XY plane approximating part of a Bezier curve.
///
/// The arc sweeps counter-clockwise from `start_angle` to `end_angle` (in
/// radians) around `center`. `interval` is the span of the source curve's
/// parameter that the arc stands in for.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    center: Point3,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    interval: ParameterInterval,
}

impl Arc {
    /// Creates a new arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive or the sweep is empty.
    pub fn new(
        center: Point3,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        interval: ParameterInterval,
    ) -> Result<Self> {
        if !(radius.is_finite() && radius > TOLERANCE) {
            return Err(BezelError::InvalidInput(format!(
                "arc radius must be positive, got {radius}"
            )));
        }
        if end_angle - start_angle <= 0.0 {
            return Err(BezelError::InvalidInput(
                "arc end angle must exceed its start angle".into(),
            ));
        }
        Ok(Self {
            center,
            radius,
            start_angle,
            end_angle,
            interval,
        })
    }

    pub(crate) fn from_fit(fit: &CircleFit, interval: ParameterInterval) -> Self {
        Self {
            center: fit.center,
            radius: fit.radius,
            start_angle: fit.start_angle,
            end_angle: fit.end_angle,
            interval,
        }
    }

    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Span of the source curve's parameter covered by this arc.
    #[must_use]
    pub fn interval(&self) -> ParameterInterval {
        self.interval
    }
}

impl Curve for Arc {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(point_on_circle(&self.center, self.radius, t))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let (sin, cos) = t.sin_cos();
        Ok(Vector3::new(-sin, cos, 0.0))
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.start_angle, self.end_angle)
    }

    fn is_closed(&self) -> bool {
        (self.end_angle - self.start_angle - std::f64::consts::TAU).abs() < TOLERANCE
    }
}

/// One piece of an arc approximation.
#[derive(Debug, Clone, PartialEq)]
pub enum ArcSegment {
    /// A circular arc.
    Circular(Arc),
    /// A span whose samples are collinear, so no finite circle fits.
    Straight {
        start: Point3,
        end: Point3,
        interval: ParameterInterval,
    },
}

impl ArcSegment {
    /// Span of the source curve's parameter covered by this piece.
    #[must_use]
    pub fn interval(&self) -> ParameterInterval {
        match self {
            Self::Circular(arc) => arc.interval(),
            Self::Straight { interval, .. } => *interval,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn quarter() -> Arc {
        Arc::new(Point3::origin(), 2.0, 0.0, FRAC_PI_2, ParameterInterval::UNIT).unwrap()
    }

    #[test]
    fn evaluates_on_circle() {
        let arc = quarter();
        let p = arc.evaluate(FRAC_PI_2).unwrap();
        assert_abs_diff_eq!(p, Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
        let t = arc.tangent(0.0).unwrap();
        assert_abs_diff_eq!(t, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert!(!arc.is_closed());
    }

    #[test]
    fn rejects_bad_radius_and_sweep() {
        assert!(Arc::new(Point3::origin(), 0.0, 0.0, 1.0, ParameterInterval::UNIT).is_err());
        assert!(Arc::new(Point3::origin(), 1.0, PI, 0.0, ParameterInterval::UNIT).is_err());
    }

    #[test]
    fn segment_reports_interval() {
        let interval = ParameterInterval::new(0.25, 0.5);
        let straight = ArcSegment::Straight {
            start: Point3::origin(),
            end: Point3::new(1.0, 0.0, 0.0),
            interval,
        };
        assert_eq!(straight.interval(), interval);
        assert_eq!(ArcSegment::Circular(quarter()).interval(), ParameterInterval::UNIT);
    }
}
