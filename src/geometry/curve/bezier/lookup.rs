use crate::error::{BezelError, Result};
use crate::math::Point3;

use super::BezierCurve;

/// Default number of steps in a lookup table (`steps + 1` samples).
pub const DEFAULT_LUT_STEPS: usize = 100;

/// Fine-search samples per coarse lookup-table step during projection.
const FINE_STEPS_PER_COARSE: u32 = 10;

/// A curve sample tagged with its parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub point: Point3,
    pub t: f64,
}

/// Closest point on a curve to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub point: Point3,
    pub t: f64,
    pub distance: f64,
}

impl BezierCurve {
    /// Evenly spaced samples at `t = i / steps` for `i` in `0..=steps`.
    ///
    /// The table is cached until the control points or weights change.
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::InvalidParameter`] if `steps` is zero.
    pub fn lut(&self, steps: usize) -> Result<Vec<CurvePoint>> {
        if steps == 0 {
            return Err(BezelError::InvalidParameter(
                "a lookup table needs at least one step".into(),
            ));
        }
        Ok(self.lut_with_steps(steps))
    }

    fn lut_with_steps(&self, steps: usize) -> Vec<CurvePoint> {
        if let Some(lut) = self.cached_lut(steps) {
            return lut;
        }
        #[allow(clippy::cast_precision_loss)]
        let lut: Vec<CurvePoint> = (0..=steps)
            .map(|i| {
                let t = i as f64 / steps as f64;
                CurvePoint {
                    point: self.compute(t),
                    t,
                }
            })
            .collect();
        self.store_lut(lut.clone());
        lut
    }

    /// Projects `point` onto the curve.
    ///
    /// A coarse scan of the default lookup table finds the nearest sample,
    /// then the two neighbouring table intervals are searched at a tenth of
    /// the table resolution.
    #[must_use]
    pub fn project(&self, point: &Point3) -> Projection {
        let lut = self.lut_with_steps(DEFAULT_LUT_STEPS);
        let closest = lut
            .iter()
            .map(|c| nalgebra::distance(&c.point, point))
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(0, |(i, _)| i);

        #[allow(clippy::cast_precision_loss)]
        let (t1, step) = {
            let l = DEFAULT_LUT_STEPS as f64;
            (
                (closest as f64 - 1.0) / l,
                1.0 / (l * f64::from(FINE_STEPS_PER_COARSE)),
            )
        };

        let mut best = Projection {
            point: lut[closest].point,
            t: lut[closest].t,
            distance: nalgebra::distance(&lut[closest].point, point),
        };
        for i in 0..=(2 * FINE_STEPS_PER_COARSE + 1) {
            let t = (t1 + f64::from(i) * step).clamp(0.0, 1.0);
            let p = self.compute(t);
            let d = nalgebra::distance(&p, point);
            if d < best.distance {
                best = Projection {
                    point: p,
                    t,
                    distance: d,
                };
            }
        }
        best
    }
}
