use tracing::debug;

use crate::error::{BezelError, Result};
use crate::geometry::{BezierCurve, Dimension};
use crate::math::{lerp, Point3, TOLERANCE};

/// Parameter step of the greedy simple-segment search.
pub const DEFAULT_REDUCE_STEP: f64 = 0.01;

/// Curve construction capability consumed by compound-shape operations.
///
/// Self-intersection and multi-segment offsetting need to build connector
/// curves and to cut curves into simple pieces; both are injected through
/// this trait so callers can substitute their own strategy.
pub trait CurveBuilder {
    /// A straight curve from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be constructed.
    fn connector(&self, from: &Point3, to: &Point3, dimension: Dimension) -> Result<BezierCurve>;

    /// Splits `curve` into simple segments, in parameter order.
    ///
    /// # Errors
    ///
    /// Returns an error if no simple decomposition exists.
    fn simple_segments(&self, curve: &BezierCurve) -> Result<Vec<BezierCurve>>;
}

/// The default builder: quadratic connectors and [`Reduce`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardBuilder;

impl CurveBuilder for StandardBuilder {
    fn connector(&self, from: &Point3, to: &Point3, dimension: Dimension) -> Result<BezierCurve> {
        let mid = lerp(0.5, from, to);
        BezierCurve::new(vec![
            dimension.wrap(*from),
            dimension.wrap(mid),
            dimension.wrap(*to),
        ])
    }

    fn simple_segments(&self, curve: &BezierCurve) -> Result<Vec<BezierCurve>> {
        Reduce::new(curve).execute()
    }
}

/// Splits a curve into segments that are each [simple](BezierCurve::is_simple).
///
/// The curve is first cut at its extrema. Each piece is then walked in
/// fixed parameter steps, growing a segment for as long as it stays
/// simple. Segments carry their sub-interval of the input curve.
#[derive(Debug)]
pub struct Reduce<'a> {
    curve: &'a BezierCurve,
    step: f64,
}

impl<'a> Reduce<'a> {
    /// Creates a new reduction of `curve`.
    #[must_use]
    pub fn new(curve: &'a BezierCurve) -> Self {
        Self {
            curve,
            step: DEFAULT_REDUCE_STEP,
        }
    }

    /// Sets the parameter step of the greedy search.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Executes the reduction.
    ///
    /// # Errors
    ///
    /// Returns `BezelError::InvalidParameter` if the step is not in
    /// `(0, 1]`, or `BezelError::ComputationFailed` if some part of the
    /// curve has no simple segment at least one step long.
    pub fn execute(&self) -> Result<Vec<BezierCurve>> {
        if !(self.step > 0.0 && self.step <= 1.0) {
            return Err(BezelError::InvalidParameter(format!(
                "reduction step must lie in (0, 1], got {}",
                self.step
            )));
        }

        let mut cuts = vec![0.0];
        cuts.extend(
            self.curve
                .extrema()
                .values
                .into_iter()
                .filter(|&t| t > TOLERANCE && t < 1.0 - TOLERANCE),
        );
        cuts.push(1.0);

        let mut segments = Vec::new();
        for pair in cuts.windows(2) {
            let piece = self.curve.split_range(pair[0], pair[1]);
            self.walk(&piece, &mut segments)?;
        }

        debug!(
            order = self.curve.order(),
            extrema = cuts.len() - 2,
            segments = segments.len(),
            "reduced curve into simple segments"
        );
        Ok(segments)
    }

    /// Greedily cuts `piece` into simple segments.
    fn walk(&self, piece: &BezierCurve, out: &mut Vec<BezierCurve>) -> Result<()> {
        let mut t1 = 0.0;
        loop {
            let mut accepted = None;
            let mut k = 1.0;
            loop {
                let t2 = (t1 + k * self.step).min(1.0);
                let candidate = piece.split_range(t1, t2);
                if !candidate.is_simple() {
                    break;
                }
                accepted = Some((t2, candidate));
                if t2 >= 1.0 {
                    break;
                }
                k += 1.0;
            }

            let Some((t2, segment)) = accepted else {
                return Err(BezelError::ComputationFailed(format!(
                    "no simple segment starts at t = {:.4}",
                    piece.interval().map(t1)
                )));
            };
            out.push(segment);
            if t2 >= 1.0 {
                return Ok(());
            }
            t1 = t2;
        }
    }
}
