use crate::error::{BezelError, Result};
use crate::geometry::BezierCurve;
use crate::math::align::align_to_baseline;
use crate::math::roots::cubic_roots;
use crate::math::{between, Point3};

/// Finds where a curve crosses a line segment in the XY plane.
///
/// The curve is aligned to the segment and the roots of its aligned
/// y-coordinates are solved in closed form; roots whose curve point falls
/// outside the segment's bounding box are dropped.
#[derive(Debug)]
pub struct LineIntersect<'a> {
    curve: &'a BezierCurve,
    start: Point3,
    end: Point3,
}

impl<'a> LineIntersect<'a> {
    /// Creates a new query against the segment from `start` to `end`.
    #[must_use]
    pub fn new(curve: &'a BezierCurve, start: Point3, end: Point3) -> Self {
        Self { curve, start, end }
    }

    /// Executes the query, returning curve parameters in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `BezelError::InvalidCurve` for curves above order 3, which
    /// have no closed-form root solver.
    pub fn execute(&self) -> Result<Vec<f64>> {
        if self.curve.order() > 3 {
            return Err(BezelError::InvalidCurve(format!(
                "line intersection supports order 3 at most, got {}",
                self.curve.order()
            )));
        }

        let mut roots = match self.curve.weights() {
            // The weighted numerator shares its zeros with the rational curve.
            Some(weights) => {
                let weighted: Vec<Point3> =
                    align_to_baseline(self.curve.points(), &self.start, &self.end)
                        .iter()
                        .zip(weights)
                        .map(|(p, w)| Point3::new(p.x, p.y * w, p.z))
                        .collect();
                cubic_roots(&weighted, &Point3::origin(), &Point3::new(1.0, 0.0, 0.0))
            }
            None => cubic_roots(self.curve.points(), &self.start, &self.end),
        };

        let (min_x, max_x) = (self.start.x.min(self.end.x), self.start.x.max(self.end.x));
        let (min_y, max_y) = (self.start.y.min(self.end.y), self.start.y.max(self.end.y));
        roots.retain(|&t| {
            let p = self.curve.compute(t);
            between(p.x, min_x, max_x) && between(p.y, min_y, max_y)
        });
        roots.sort_by(f64::total_cmp);
        roots.dedup();
        Ok(roots)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::planar;
    use approx::assert_abs_diff_eq;

    #[test]
    fn arch_crosses_horizontal_segment() {
        let arch = planar(&[(0.0, 0.0), (20.0, 120.0), (80.0, 120.0), (100.0, 0.0)]);
        let (start, end) = (Point3::new(-10.0, 50.0, 0.0), Point3::new(110.0, 50.0, 0.0));
        let ts = LineIntersect::new(&arch, start, end).execute().unwrap();
        assert_eq!(ts.len(), 2);
        for t in ts {
            assert_abs_diff_eq!(arch.compute(t).y, 50.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn short_segment_filters_roots() {
        let arch = planar(&[(0.0, 0.0), (20.0, 120.0), (80.0, 120.0), (100.0, 0.0)]);
        let (start, end) = (Point3::new(0.0, 50.0, 0.0), Point3::new(50.0, 50.0, 0.0));
        let ts = LineIntersect::new(&arch, start, end).execute().unwrap();
        assert_eq!(ts.len(), 1);
        assert!(ts[0] < 0.5);
    }

    #[test]
    fn rational_quarter_circle_meets_diagonal() {
        let arc = planar(&[(1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
            .with_weights(vec![1.0, std::f64::consts::FRAC_1_SQRT_2, 1.0])
            .unwrap();
        let ts = LineIntersect::new(&arc, Point3::origin(), Point3::new(2.0, 2.0, 0.0))
            .execute()
            .unwrap();
        assert_eq!(ts.len(), 1);
        let p = arc.compute(ts[0]);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_abs_diff_eq!(p, Point3::new(h, h, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn high_order_is_rejected() {
        let quartic = planar(&[(0.0, 0.0), (1.0, 2.0), (2.0, -2.0), (3.0, 2.0), (4.0, 0.0)]);
        assert!(matches!(
            LineIntersect::new(&quartic, Point3::origin(), Point3::new(4.0, 0.0, 0.0)).execute(),
            Err(BezelError::InvalidCurve(_))
        ));
    }
}
