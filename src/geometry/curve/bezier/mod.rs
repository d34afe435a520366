//! Polynomial and rational Bezier curves in 2D or 3D.
//!
//! A [`BezierCurve`] owns its control points (stored as 3D points, with
//! z = 0 for planar curves), a [`Dimension`] tag fixed at construction,
//! optional rational weights and the parameter interval it represents on
//! the curve it was cut from.
//!
//! Derived data (derivative hierarchy, winding flag, lookup table) is built
//! lazily and rebuilt whenever a structural fingerprint of the control
//! points and weights changes, so in-place edits through
//! [`BezierCurve::points_mut`] are picked up without a dirty flag.

mod evaluate;
mod extrema;
mod fit;
mod lookup;
mod split;

pub use evaluate::{Curvature, OffsetPoint};
pub use extrema::{AxisBounds, BoundingBox, Extrema};
pub use lookup::{CurvePoint, Projection, DEFAULT_LUT_STEPS};
pub use split::Split;

use std::cell::{Ref, RefCell};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::{BezelError, Result};
use crate::geometry::point::{Dimension, Point};
use crate::math::align::signed_angle;
use crate::math::{in_unit_interval, Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain, ParameterInterval};

/// Control points may stray from the chord by this fraction of its length
/// (summed) for the curve to count as linear.
const LINEAR_RATIO: f64 = 1.0 / 50.0;

#[derive(Debug, Clone, Default)]
struct DerivedCache {
    fingerprint: Option<u64>,
    derivatives: Vec<Vec<Point3>>,
    clockwise: bool,
    lut: Vec<CurvePoint>,
}

/// A Bezier curve of arbitrary order.
#[derive(Debug, Clone)]
pub struct BezierCurve {
    points: Vec<Point3>,
    dimension: Dimension,
    weights: Option<Vec<f64>>,
    linear: bool,
    interval: ParameterInterval,
    cache: RefCell<DerivedCache>,
}

impl BezierCurve {
    /// Creates a curve from at least two control points.
    ///
    /// The curve is spatial if any point is spatial; planar points are then
    /// placed at z = 0.
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::InvalidInput`] for fewer than two points or
    /// non-finite coordinates.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        let dimension = if points.iter().any(|p| p.dimension() == Dimension::Spatial) {
            Dimension::Spatial
        } else {
            Dimension::Planar
        };
        let points = validate_points(&points)?;
        Ok(Self::from_parts(points, dimension, None, ParameterInterval::UNIT))
    }

    /// Creates a curve from a flat coordinate list, `dimension.axes()` values
    /// per point.
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::InvalidInput`] if the list length is not a
    /// multiple of the axis count, or describes fewer than two points.
    pub fn from_coords(coords: &[f64], dimension: Dimension) -> Result<Self> {
        let axes = dimension.axes();
        if coords.len() % axes != 0 {
            return Err(BezelError::InvalidInput(format!(
                "{} coordinates do not form {axes}-dimensional points",
                coords.len()
            )));
        }
        let points: Vec<Point> = coords
            .chunks_exact(axes)
            .map(|c| match dimension {
                Dimension::Planar => Point::planar(c[0], c[1]),
                Dimension::Spatial => Point::spatial(c[0], c[1], c[2]),
            })
            .collect();
        let points = validate_points(&points)?;
        Ok(Self::from_parts(points, dimension, None, ParameterInterval::UNIT))
    }

    /// Builds a curve from already validated internal data.
    pub(crate) fn from_parts(
        points: Vec<Point3>,
        dimension: Dimension,
        weights: Option<Vec<f64>>,
        interval: ParameterInterval,
    ) -> Self {
        let linear = is_linear(&points);
        Self {
            points,
            dimension,
            weights,
            linear,
            interval,
            cache: RefCell::new(DerivedCache::default()),
        }
    }

    /// A polynomial curve over `points` sharing this curve's dimension.
    pub(crate) fn with_points(&self, points: Vec<Point3>) -> Self {
        Self::from_parts(points, self.dimension, None, ParameterInterval::UNIT)
    }

    /// Attaches rational weights, one per control point.
    ///
    /// # Errors
    ///
    /// See [`BezierCurve::set_weights`].
    pub fn with_weights(mut self, weights: Vec<f64>) -> Result<Self> {
        self.set_weights(weights)?;
        Ok(self)
    }

    /// Replaces the rational weights.
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::InvalidCurve`] for curves of order 4 or higher,
    /// and [`BezelError::InvalidInput`] if the weight count differs from the
    /// point count or any weight is not finite and positive.
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        if self.order() > 3 {
            return Err(BezelError::InvalidCurve(format!(
                "rational weights require order 3 or lower, curve has order {}",
                self.order()
            )));
        }
        if weights.len() != self.points.len() {
            return Err(BezelError::InvalidInput(format!(
                "expected {} weights, got {}",
                self.points.len(),
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(BezelError::InvalidInput(format!(
                "weights must be finite and positive, got {w}"
            )));
        }
        self.weights = Some(weights);
        Ok(())
    }

    /// Drops the rational weights, making the curve polynomial again.
    pub fn clear_weights(&mut self) {
        self.weights = None;
    }

    /// Replaces all control points and recomputes the linear flag.
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::InvalidInput`] if fewer than two points are
    /// given, a point's dimension differs from the curve's, coordinates are
    /// not finite, or the point count no longer matches the weights.
    pub fn set_points(&mut self, points: Vec<Point>) -> Result<()> {
        if let Some(p) = points.iter().find(|p| p.dimension() != self.dimension) {
            return Err(BezelError::InvalidInput(format!(
                "{:?} point given to a {:?} curve",
                p.dimension(),
                self.dimension
            )));
        }
        if let Some(w) = &self.weights {
            if w.len() != points.len() {
                return Err(BezelError::InvalidInput(format!(
                    "curve carries {} weights but {} points were given",
                    w.len(),
                    points.len()
                )));
            }
        }
        let points = validate_points(&points)?;
        self.linear = is_linear(&points);
        self.points = points;
        Ok(())
    }

    /// Mutable access to the control points.
    ///
    /// Derived caches are rebuilt on the next query. The linear flag is not
    /// recomputed; use [`BezierCurve::set_points`] for that. Planar curves
    /// must keep z at zero.
    pub fn points_mut(&mut self) -> &mut [Point3] {
        &mut self.points
    }

    /// Control points, with z = 0 for planar curves.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Control points tagged with the curve's dimension.
    #[must_use]
    pub fn control_points(&self) -> Vec<Point> {
        self.points.iter().map(|p| self.dimension.wrap(*p)).collect()
    }

    /// First control point.
    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.points[0]
    }

    /// Last control point.
    #[must_use]
    pub fn end(&self) -> &Point3 {
        &self.points[self.points.len() - 1]
    }

    /// Polynomial degree: control-point count minus one.
    #[must_use]
    pub fn order(&self) -> usize {
        self.points.len() - 1
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn is_spatial(&self) -> bool {
        self.dimension == Dimension::Spatial
    }

    #[must_use]
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    #[must_use]
    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }

    /// Whether the curve is, practically speaking, a straight line.
    #[must_use]
    pub fn is_linear(&self) -> bool {
        self.linear
    }

    /// Sub-interval of the ancestor curve this curve represents.
    #[must_use]
    pub fn interval(&self) -> ParameterInterval {
        self.interval
    }

    pub(crate) fn set_interval(&mut self, interval: ParameterInterval) {
        self.interval = interval;
    }

    /// Winding of the chord through the first interior control point.
    ///
    /// Uses the XY projection for spatial curves.
    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        self.cache().clockwise
    }

    /// Derivative hierarchy: `order` levels of control points, each one
    /// order lower than the previous.
    #[must_use]
    pub fn derivatives(&self) -> Vec<Vec<Point3>> {
        self.cache().derivatives.clone()
    }

    pub(crate) fn derivative_level(&self, level: usize) -> Option<Ref<'_, [Point3]>> {
        Ref::filter_map(self.cache(), |c| c.derivatives.get(level).map(Vec::as_slice)).ok()
    }

    /// The derived cache, rebuilt first if the fingerprint changed.
    fn cache(&self) -> Ref<'_, DerivedCache> {
        let print = self.fingerprint();
        let stale = self.cache.borrow().fingerprint != Some(print);
        if stale {
            let mut cache = self.cache.borrow_mut();
            cache.fingerprint = Some(print);
            cache.derivatives = evaluate::derive(&self.points);
            cache.clockwise =
                signed_angle(&self.points[0], self.end(), &self.points[1]) > 0.0;
            cache.lut.clear();
        }
        self.cache.borrow()
    }

    pub(crate) fn cached_lut(&self, steps: usize) -> Option<Vec<CurvePoint>> {
        let cache = self.cache();
        (cache.lut.len() == steps + 1).then(|| cache.lut.clone())
    }

    /// Must follow a [`Self::cached_lut`] miss so the fingerprint is current.
    pub(crate) fn store_lut(&self, lut: Vec<CurvePoint>) {
        self.cache.borrow_mut().lut = lut;
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for p in &self.points {
            p.x.to_bits().hash(&mut hasher);
            p.y.to_bits().hash(&mut hasher);
            p.z.to_bits().hash(&mut hasher);
        }
        if let Some(weights) = &self.weights {
            for w in weights {
                w.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

impl Curve for BezierCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        if !in_unit_interval(t) {
            return Err(BezelError::t_out_of_range(t));
        }
        Ok(self.compute(t))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        if !in_unit_interval(t) {
            return Err(BezelError::t_out_of_range(t));
        }
        let d = self.leading_derivative(t)?;
        Ok(d.normalize())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        nalgebra::distance(self.start(), self.end()) < TOLERANCE
    }
}

fn validate_points(points: &[Point]) -> Result<Vec<Point3>> {
    if points.len() < 2 {
        return Err(BezelError::InvalidInput(format!(
            "a curve needs at least 2 control points, got {}",
            points.len()
        )));
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(BezelError::InvalidInput(
            "control point coordinates must be finite".into(),
        ));
    }
    Ok(points.iter().map(Point::to_point3).collect())
}

fn is_linear(points: &[Point3]) -> bool {
    let start = points[0];
    let chord = points[points.len() - 1] - start;
    let base = chord.norm();
    if base < TOLERANCE {
        return false;
    }
    let dir = chord / base;
    let deviation: f64 = points.iter().map(|p| (p - start).cross(&dir).norm()).sum();
    deviation < base * LINEAR_RATIO
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{planar, spatial};

    #[test]
    fn dimension_from_points() {
        let c = BezierCurve::new(vec![Point::planar(0.0, 0.0), Point::spatial(1.0, 1.0, 1.0)])
            .unwrap();
        assert!(c.is_spatial());
        assert_eq!(c.points()[0], Point3::origin());
        assert!(!planar(&[(0.0, 0.0), (1.0, 1.0)]).is_spatial());
    }

    #[test]
    fn too_few_points_rejected() {
        let err = BezierCurve::new(vec![Point::planar(0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, BezelError::InvalidInput(_)));
    }

    #[test]
    fn flat_coordinates() {
        let c = BezierCurve::from_coords(&[0.0, 0.0, 1.0, 2.0, 3.0, 0.0], Dimension::Planar)
            .unwrap();
        assert_eq!(c.order(), 2);
        assert_eq!(c.control_points()[1], Point::planar(1.0, 2.0));

        let c = BezierCurve::from_coords(&[0.0, 0.0, 1.0, 2.0, 3.0, 0.0], Dimension::Spatial)
            .unwrap();
        assert_eq!(c.order(), 1);
        assert!(BezierCurve::from_coords(&[0.0, 0.0, 1.0], Dimension::Planar).is_err());
    }

    #[test]
    fn linear_flag() {
        assert!(planar(&[(0.0, 0.0), (50.0, 0.5), (100.0, 0.0)]).is_linear());
        assert!(!planar(&[(0.0, 0.0), (50.0, 40.0), (100.0, 0.0)]).is_linear());
        assert!(spatial(&[(0.0, 0.0, 0.0), (5.0, 5.0, 5.0), (10.0, 10.0, 10.0)]).is_linear());
    }

    #[test]
    fn winding_flag() {
        // Screen convention (y down): a bulge towards +y reads clockwise.
        let up = planar(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]);
        let down = planar(&[(0.0, 0.0), (50.0, -50.0), (100.0, 0.0)]);
        assert!(up.is_clockwise());
        assert!(!down.is_clockwise());
    }

    #[test]
    fn weights_are_validated() {
        let c = planar(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert!(matches!(
            c.clone().with_weights(vec![1.0, 2.0]).unwrap_err(),
            BezelError::InvalidInput(_)
        ));
        assert!(matches!(
            c.clone().with_weights(vec![1.0, -2.0, 1.0]).unwrap_err(),
            BezelError::InvalidInput(_)
        ));
        let quartic = planar(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)]);
        assert!(matches!(
            quartic.with_weights(vec![1.0; 5]).unwrap_err(),
            BezelError::InvalidCurve(_)
        ));
        let mut w = c.with_weights(vec![1.0, 2.0, 1.0]).unwrap();
        assert!(w.is_rational());
        w.clear_weights();
        assert!(w.weights().is_none());
    }

    #[test]
    fn set_points_checks_dimension_and_weight_count() {
        let mut c = planar(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert!(c
            .set_points(vec![Point::spatial(0.0, 0.0, 0.0), Point::spatial(1.0, 0.0, 0.0)])
            .is_err());
        c.set_points(vec![Point::planar(0.0, 0.0), Point::planar(10.0, 0.0)])
            .unwrap();
        assert_eq!(c.order(), 1);
        assert!(c.is_linear());

        let mut w = planar(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)])
            .with_weights(vec![1.0, 1.0, 1.0])
            .unwrap();
        assert!(w.set_points(vec![Point::planar(0.0, 0.0), Point::planar(1.0, 0.0)]).is_err());
    }

    #[test]
    fn in_place_edit_invalidates_derivatives() {
        let mut c = planar(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert_eq!(c.derivatives()[0][0], Point3::new(2.0, 2.0, 0.0));
        c.points_mut()[1] = Point3::new(1.0, 3.0, 0.0);
        assert_eq!(c.derivatives()[0][0], Point3::new(2.0, 6.0, 0.0));
        assert!(c.is_clockwise());
        c.points_mut()[1] = Point3::new(1.0, -3.0, 0.0);
        assert!(!c.is_clockwise());
    }

    #[test]
    fn trait_evaluation_checks_range() {
        let c = planar(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert!(matches!(
            c.evaluate(1.5).unwrap_err(),
            BezelError::ParameterOutOfRange { .. }
        ));
        assert_eq!(c.evaluate(1.0).unwrap(), Point3::new(2.0, 0.0, 0.0));
        assert_eq!(c.domain(), CurveDomain::new(0.0, 1.0));
        assert!(!c.is_closed());
    }
}
