use tracing::{debug, warn};

use crate::error::{BezelError, Result};
use crate::geometry::BezierCurve;
use crate::math::intersect_2d::line_line_intersect;
use crate::math::{Point3, Vector3};
use crate::operations::transform::Translate;

/// Offset used to probe the end normals when locating the scaling origin.
const PROBE_DISTANCE: f64 = 10.0;

/// How far to move a curve: a fixed distance or a function of `t`.
#[derive(Clone, Copy)]
pub enum OffsetDistance<'f> {
    Constant(f64),
    Variable(&'f dyn Fn(f64) -> f64),
}

impl OffsetDistance<'_> {
    fn at(&self, t: f64) -> f64 {
        match self {
            Self::Constant(d) => *d,
            Self::Variable(f) => f(t),
        }
    }
}

impl std::fmt::Debug for OffsetDistance<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(d) => f.debug_tuple("Constant").field(d).finish(),
            Self::Variable(_) => f.write_str("Variable(..)"),
        }
    }
}

/// Scales a simple curve about the meeting point of its end normals.
///
/// This is the single-segment offset construction: end points move along
/// their normals and interior control points are repositioned relative to
/// the normals' intersection. The result approximates the offset curve;
/// it is only meaningful for curves that are [simple](BezierCurve::is_simple).
/// Linear curves are translated along their normal instead.
#[derive(Debug)]
pub struct CurveScale<'a> {
    curve: &'a BezierCurve,
    distance: OffsetDistance<'a>,
}

impl<'a> CurveScale<'a> {
    /// Creates a constant-distance scale.
    #[must_use]
    pub fn new(curve: &'a BezierCurve, distance: f64) -> Self {
        Self {
            curve,
            distance: OffsetDistance::Constant(distance),
        }
    }

    /// Creates a scale whose distance varies with the curve parameter.
    #[must_use]
    pub fn variable(curve: &'a BezierCurve, distance: &'a dyn Fn(f64) -> f64) -> Self {
        Self {
            curve,
            distance: OffsetDistance::Variable(distance),
        }
    }

    /// Executes the scale.
    ///
    /// Quadratics with a variable distance are raised to cubics first.
    ///
    /// # Errors
    ///
    /// Returns `BezelError::InvalidCurve` if the end normals are parallel,
    /// if the curve has no normal, or if a non-linear curve is above
    /// order 3.
    pub fn execute(&self) -> Result<BezierCurve> {
        let curve = self.curve;
        let order = curve.order();

        if matches!(self.distance, OffsetDistance::Variable(_)) && order == 2 {
            let raised = curve.raise()?;
            return CurveScale {
                curve: &raised,
                distance: self.distance,
            }
            .execute();
        }

        let (r1, r2) = (self.distance.at(0.0), self.distance.at(1.0));
        if curve.is_linear() {
            debug!(order, "scaling a linear curve, translating instead");
            return Translate::new(curve, curve.normal(0.0)?, r1, r2).execute();
        }
        if order > 3 {
            return Err(BezelError::InvalidCurve(format!(
                "scale supports non-linear curves up to order 3, got {order}"
            )));
        }

        let probes = [
            curve.offset_point(0.0, PROBE_DISTANCE)?,
            curve.offset_point(1.0, PROBE_DISTANCE)?,
        ];
        let Some(origin) = line_line_intersect(
            &probes[0].point,
            &probes[0].curve_point,
            &probes[1].point,
            &probes[1].curve_point,
        ) else {
            warn!(order, "end normals are parallel, cannot scale");
            return Err(BezelError::InvalidCurve(
                "end normals are parallel; reduce the curve first".into(),
            ));
        };

        let points = curve.points();
        let mut scaled = points.to_vec();
        scaled[0] = points[0] + probes[0].normal * r1;
        scaled[order] = points[order] + probes[1].normal * r2;

        match self.distance {
            OffsetDistance::Constant(_) => {
                for t in [0usize, 1] {
                    if order == 2 && t == 1 {
                        continue;
                    }
                    #[allow(clippy::cast_precision_loss)]
                    let tf = t as f64;
                    let p = scaled[t * order];
                    let tangent_end = p + curve.derivative(tf);
                    scaled[t + 1] = line_line_intersect(&p, &tangent_end, &origin, &points[t + 1])
                        .ok_or_else(|| {
                            warn!(order, index = t + 1, "control ray is parallel to tangent");
                            BezelError::InvalidCurve(
                                "control point ray is parallel to the offset tangent".into(),
                            )
                        })?;
                }
            }
            OffsetDistance::Variable(f) => {
                let clockwise = curve.is_clockwise();
                for t in [0usize, 1] {
                    let p = points[t + 1];
                    #[allow(clippy::cast_precision_loss)]
                    let mut rc = f((t + 1) as f64 / order as f64);
                    if !clockwise {
                        rc = -rc;
                    }
                    scaled[t + 1] = p + outward(&origin, &p)? * rc;
                }
            }
        }

        Ok(curve.with_points(scaled))
    }
}

fn outward(origin: &Point3, p: &Point3) -> Result<Vector3> {
    (p - origin).try_normalize(0.0).ok_or_else(|| {
        BezelError::InvalidCurve("control point coincides with scaling origin".into())
    })
}
