use crate::error::{BezelError, Result};
use crate::geometry::BezierCurve;
use crate::math::{Point3, Vector3, TOLERANCE};

/// Moves a curve's control points along a direction.
///
/// The distance is interpolated linearly over the control point index, from
/// `d1` at the start point to `d2` at the end point. With `d1 == d2` this
/// is an exact translation; otherwise it approximates a tapered offset.
#[derive(Debug)]
pub struct Translate<'a> {
    curve: &'a BezierCurve,
    direction: Vector3,
    d1: f64,
    d2: f64,
}

impl<'a> Translate<'a> {
    /// Creates a tapered translation.
    #[must_use]
    pub fn new(curve: &'a BezierCurve, direction: Vector3, d1: f64, d2: f64) -> Self {
        Self {
            curve,
            direction,
            d1,
            d2,
        }
    }

    /// Creates a rigid translation by `distance` along `direction`.
    #[must_use]
    pub fn uniform(curve: &'a BezierCurve, direction: Vector3, distance: f64) -> Self {
        Self::new(curve, direction, distance, distance)
    }

    /// Executes the translation, returning a new curve.
    ///
    /// Planar curves ignore the direction's z component; the rest is
    /// normalized. Weights are kept.
    ///
    /// # Errors
    ///
    /// Returns `BezelError::InvalidParameter` for a zero or non-finite
    /// direction, or for non-finite distances.
    pub fn execute(&self) -> Result<BezierCurve> {
        let mut direction = self.direction;
        if !self.curve.is_spatial() {
            direction.z = 0.0;
        }
        let norm = direction.norm();
        if !norm.is_finite() || norm < TOLERANCE {
            return Err(BezelError::InvalidParameter(
                "translation direction must be a finite non-zero vector".into(),
            ));
        }
        if !(self.d1.is_finite() && self.d2.is_finite()) {
            return Err(BezelError::InvalidParameter(format!(
                "translation distances must be finite, got {} and {}",
                self.d1, self.d2
            )));
        }

        let direction = direction / norm;
        #[allow(clippy::cast_precision_loss)]
        let order = self.curve.order() as f64;
        let points: Vec<Point3> = self
            .curve
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                #[allow(clippy::cast_precision_loss)]
                let ratio = i as f64 / order;
                let d = (1.0 - ratio) * self.d1 + ratio * self.d2;
                p + direction * d
            })
            .collect();

        let translated = self.curve.with_points(points);
        match self.curve.weights() {
            Some(w) => translated.with_weights(w.to_vec()),
            None => Ok(translated),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{planar, spatial};
    use approx::assert_abs_diff_eq;

    #[test]
    fn uniform_translation_moves_every_point() {
        let c = planar(&[(0.0, 0.0), (50.0, 100.0), (100.0, 0.0)]);
        let moved = Translate::uniform(&c, Vector3::new(0.0, 2.0, 0.0), 5.0)
            .execute()
            .unwrap();
        for (p, q) in c.points().iter().zip(moved.points()) {
            assert_abs_diff_eq!(*q, p + Vector3::new(0.0, 5.0, 0.0), epsilon = 1e-12);
        }
        let shift = Vector3::new(0.0, 5.0, 0.0);
        assert_abs_diff_eq!(moved.compute(0.3), c.compute(0.3) + shift, epsilon = 1e-9);
    }

    #[test]
    fn tapered_translation_interpolates() {
        let c = planar(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)]);
        let moved = Translate::new(&c, Vector3::y(), 0.0, 3.0).execute().unwrap();
        let ys: Vec<f64> = moved.points().iter().map(|p| p.y).collect();
        assert_abs_diff_eq!(ys.as_slice(), [0.0, 1.0, 2.0, 3.0].as_slice(), epsilon = 1e-12);
    }

    #[test]
    fn planar_curve_stays_planar() {
        let c = planar(&[(0.0, 0.0), (10.0, 0.0)]);
        let moved = Translate::uniform(&c, Vector3::new(0.0, 0.0, 1.0), 1.0).execute();
        assert!(moved.is_err());
        let moved = Translate::uniform(&c, Vector3::new(1.0, 0.0, 1.0), 2.0)
            .execute()
            .unwrap();
        assert!(!moved.is_spatial());
        assert!(moved.points().iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn spatial_translation_uses_z() {
        let c = spatial(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)]);
        let moved = Translate::uniform(&c, Vector3::z(), 4.0).execute().unwrap();
        assert_abs_diff_eq!(moved.end().z, 4.0);
    }

    #[test]
    fn rejects_zero_direction() {
        let c = planar(&[(0.0, 0.0), (10.0, 0.0)]);
        assert!(Translate::uniform(&c, Vector3::zeros(), 1.0).execute().is_err());
    }
}
