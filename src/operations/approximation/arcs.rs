use tracing::debug;

use crate::error::{BezelError, Result};
use crate::geometry::{Arc, ArcSegment, BezierCurve, ParameterInterval};
use crate::math::arc_2d::circle_through_points;
use crate::math::Point3;

/// Tuning for [`ArcApproximation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcOptions {
    /// Largest accepted distance between the curve and a fitted arc,
    /// measured at the span's quarter points.
    pub error_threshold: f64,
    /// Shortest span in curve parameter, at least `f64::EPSILON`. A span
    /// this short is accepted even if it exceeds the error threshold.
    pub min_step: f64,
    /// Bisection steps spent growing a span towards the longest good fit.
    pub max_refinements: usize,
}

impl Default for ArcOptions {
    fn default() -> Self {
        Self {
            error_threshold: 0.5,
            min_step: 1e-3,
            max_refinements: 100,
        }
    }
}

impl ArcOptions {
    fn validate(&self) -> Result<()> {
        if !(self.error_threshold.is_finite() && self.error_threshold > 0.0) {
            return Err(BezelError::InvalidParameter(format!(
                "arc error threshold must be positive and finite, got {}",
                self.error_threshold
            )));
        }
        if !(self.min_step >= f64::EPSILON && self.min_step <= 1.0) {
            return Err(BezelError::InvalidParameter(format!(
                "arc minimum step must lie in [{}, 1], got {}",
                f64::EPSILON,
                self.min_step
            )));
        }
        Ok(())
    }
}

/// A candidate span and how far the curve strays from it.
struct Fit {
    segment: ArcSegment,
    error: f64,
}

/// Approximates a planar curve by a chain of circular arcs.
///
/// Spans are grown from the start of the curve: the remaining curve is
/// tried in one piece, halved until an arc through the span's end points
/// and midpoint fits, then bisected back out towards the longest span that
/// still fits. Spans whose samples are collinear become straight pieces.
#[derive(Debug)]
pub struct ArcApproximation<'a> {
    curve: &'a BezierCurve,
    options: ArcOptions,
}

impl<'a> ArcApproximation<'a> {
    /// Creates a new arc approximation of `curve`.
    #[must_use]
    pub fn new(curve: &'a BezierCurve) -> Self {
        Self {
            curve,
            options: ArcOptions::default(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn options(mut self, options: ArcOptions) -> Self {
        self.options = options;
        self
    }

    /// Shorthand for changing only the error threshold.
    #[must_use]
    pub fn error_threshold(mut self, error_threshold: f64) -> Self {
        self.options.error_threshold = error_threshold;
        self
    }

    /// Executes the approximation.
    ///
    /// The returned pieces cover `[0, 1]` in order, each starting where the
    /// previous one ends.
    ///
    /// # Errors
    ///
    /// Returns `BezelError::InvalidInput` for spatial curves and
    /// `BezelError::InvalidParameter` for malformed options.
    pub fn execute(&self) -> Result<Vec<ArcSegment>> {
        if self.curve.is_spatial() {
            return Err(BezelError::InvalidInput(
                "arc approximation needs a planar curve".into(),
            ));
        }
        self.options.validate()?;

        let mut spans = Vec::new();
        let mut s = 0.0;
        while s < 1.0 {
            let (e, fit) = self.grow(s);
            debug!(
                start = s,
                end = e,
                error = fit.error,
                circular = matches!(fit.segment, ArcSegment::Circular(_)),
                "arc span"
            );
            spans.push(fit.segment);
            s = e;
        }
        Ok(spans)
    }

    /// Finds the end of the span starting at `s`.
    fn grow(&self, s: f64) -> (f64, Fit) {
        let threshold = self.options.error_threshold;
        let min_step = self.options.min_step;

        let mut e = 1.0;
        let mut fit = self.fit(s, e);
        let mut bad = None;
        while fit.error > threshold {
            let half = (e - s) / 2.0;
            let next = if half > min_step {
                s + half
            } else {
                (s + min_step).min(1.0)
            };
            // `e` only ever shrinks; once it stops the span is at the floor.
            if next >= e {
                break;
            }
            bad = Some(e);
            e = next;
            fit = self.fit(s, e);
        }

        if fit.error > threshold {
            debug!(start = s, end = e, error = fit.error, "accepting span at minimum step");
            return (e, fit);
        }

        if let Some(mut b) = bad {
            for _ in 0..self.options.max_refinements {
                if b - e < min_step {
                    break;
                }
                let mid = (e + b) / 2.0;
                let candidate = self.fit(s, mid);
                if candidate.error <= threshold {
                    e = mid;
                    fit = candidate;
                } else {
                    b = mid;
                }
            }
        }
        (e, fit)
    }

    fn fit(&self, s: f64, e: f64) -> Fit {
        let interval = ParameterInterval::new(s, e);
        let start = self.curve.compute(s);
        let middle = self.curve.compute(interval.midpoint());
        let end = self.curve.compute(e);
        let q = (e - s) / 4.0;
        let quarters = [self.curve.compute(s + q), self.curve.compute(e - q)];

        match circle_through_points(&start, &middle, &end) {
            Some(circle) => {
                let error = quarters
                    .iter()
                    .map(|p| (nalgebra::distance(&circle.center, p) - circle.radius).abs())
                    .fold(0.0, f64::max);
                Fit {
                    segment: ArcSegment::Circular(Arc::from_fit(&circle, interval)),
                    error,
                }
            }
            None => {
                let error = quarters
                    .iter()
                    .map(|p| distance_to_line(p, &start, &end))
                    .fold(0.0, f64::max);
                Fit {
                    segment: ArcSegment::Straight {
                        start,
                        end,
                        interval,
                    },
                    error,
                }
            }
        }
    }
}

/// Distance from `p` to the line through `a` and `b` in the XY plane; the
/// distance to `a` if the two coincide.
fn distance_to_line(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / length
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Curve;
    use crate::test_support::{init_tracing, planar, spatial};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn assert_contiguous(spans: &[ArcSegment]) {
        assert!(!spans.is_empty());
        assert_eq!(spans[0].interval().start, 0.0);
        assert_eq!(spans[spans.len() - 1].interval().end, 1.0);
        for pair in spans.windows(2) {
            assert_eq!(pair[0].interval().end, pair[1].interval().start);
        }
        for span in spans {
            assert!(span.interval().end > span.interval().start);
        }
    }

    #[test]
    fn rational_quarter_circle_is_one_arc() {
        let c = planar(&[(1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
            .with_weights(vec![1.0, std::f64::consts::FRAC_1_SQRT_2, 1.0])
            .unwrap();
        let spans = ArcApproximation::new(&c).error_threshold(1e-6).execute().unwrap();
        assert_eq!(spans.len(), 1);
        let ArcSegment::Circular(arc) = &spans[0] else {
            panic!("expected a circular span");
        };
        assert_abs_diff_eq!(*arc.center(), Point3::origin(), epsilon = 1e-9);
        assert_abs_diff_eq!(arc.radius(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.start_angle(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.end_angle(), FRAC_PI_2, epsilon = 1e-9);
        let p = arc.evaluate(arc.domain().t_max).unwrap();
        assert_abs_diff_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn line_is_one_straight_piece() {
        let c = planar(&[(0.0, 0.0), (50.0, 50.0), (100.0, 100.0)]);
        let spans = ArcApproximation::new(&c).execute().unwrap();
        assert_contiguous(&spans);
        assert_eq!(spans.len(), 1);
        assert!(matches!(spans[0], ArcSegment::Straight { .. }));
    }

    #[test]
    fn s_curve_spans_fit_within_threshold() {
        init_tracing();
        let c = planar(&[(0.0, 0.0), (30.0, 80.0), (70.0, -80.0), (100.0, 0.0)]);
        let threshold = 0.1;
        let spans = ArcApproximation::new(&c)
            .error_threshold(threshold)
            .execute()
            .unwrap();
        assert_contiguous(&spans);
        assert!(spans.len() > 2);
        for span in &spans {
            let ArcSegment::Circular(arc) = span else {
                continue;
            };
            let i = arc.interval();
            let q = (i.end - i.start) / 4.0;
            for t in [i.start + q, i.end - q] {
                let d = nalgebra::distance(arc.center(), &c.compute(t));
                assert!((d - arc.radius()).abs() <= threshold + 1e-12);
            }
            let d = nalgebra::distance(arc.center(), &c.compute(i.start));
            assert_abs_diff_eq!(d, arc.radius(), epsilon = 1e-6);
        }
    }

    #[test]
    fn unreachable_threshold_still_terminates() {
        let c = planar(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0)]);
        for (min_step, most) in [(0.05, 21), (0.03, 35), (0.1, 11)] {
            let options = ArcOptions {
                error_threshold: 1e-12,
                min_step,
                max_refinements: 10,
            };
            let spans = ArcApproximation::new(&c).options(options).execute().unwrap();
            assert_contiguous(&spans);
            assert!(spans.len() <= most, "{} spans for step {min_step}", spans.len());
            for span in &spans[..spans.len() - 1] {
                let i = span.interval();
                assert!(i.end - i.start >= min_step * (1.0 - 1e-9));
            }
        }
    }

    #[test]
    fn rejects_spatial_curves_and_bad_options() {
        let c = spatial(&[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)]);
        assert!(matches!(
            ArcApproximation::new(&c).execute(),
            Err(BezelError::InvalidInput(_))
        ));
        let c = planar(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(
            ArcApproximation::new(&c).error_threshold(0.0).execute(),
            Err(BezelError::InvalidParameter(_))
        ));
        for min_step in [0.0, 1e-300, 1.5] {
            let options = ArcOptions {
                min_step,
                ..ArcOptions::default()
            };
            assert!(ArcApproximation::new(&c).options(options).execute().is_err());
        }
    }
}
