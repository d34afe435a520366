use tracing::debug;

use crate::error::Result;
use crate::geometry::BezierCurve;
use crate::operations::modification::{CurveBuilder, StandardBuilder};
use crate::operations::transform::Translate;

use super::CurveScale;

/// Offsets a curve by a constant distance along its normals.
///
/// Linear curves are translated in one piece. Anything else is cut into
/// simple segments by the builder, and each segment is scaled (or
/// translated, if it is linear). Positive distances follow the normal
/// direction of [`BezierCurve::normal`].
#[derive(Debug)]
pub struct CurveOffset<'a, B: CurveBuilder = StandardBuilder> {
    curve: &'a BezierCurve,
    distance: f64,
    builder: B,
}

impl<'a> CurveOffset<'a, StandardBuilder> {
    /// Creates a new offset operation using the standard builder.
    #[must_use]
    pub fn new(curve: &'a BezierCurve, distance: f64) -> Self {
        Self {
            curve,
            distance,
            builder: StandardBuilder,
        }
    }
}

impl<'a, B: CurveBuilder> CurveOffset<'a, B> {
    /// Replaces the curve builder.
    #[must_use]
    pub fn builder<C: CurveBuilder>(self, builder: C) -> CurveOffset<'a, C> {
        CurveOffset {
            curve: self.curve,
            distance: self.distance,
            builder,
        }
    }

    /// Executes the offset, returning one curve per simple segment.
    ///
    /// # Errors
    ///
    /// Returns `BezelError::InvalidCurve` if a segment cannot be scaled and
    /// propagates reduction failures.
    pub fn execute(&self) -> Result<Vec<BezierCurve>> {
        if self.curve.is_linear() {
            let normal = self.curve.normal(0.0)?;
            return Ok(vec![Translate::uniform(self.curve, normal, self.distance).execute()?]);
        }

        let segments = self.builder.simple_segments(self.curve)?;
        let offsets = segments
            .iter()
            .map(|segment| {
                if segment.is_linear() {
                    let normal = segment.normal(0.0)?;
                    Translate::uniform(segment, normal, self.distance).execute()
                } else {
                    CurveScale::new(segment, self.distance).execute()
                }
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            segments = offsets.len(),
            distance = self.distance,
            "offset curve built"
        );
        Ok(offsets)
    }
}
