use tracing::debug;

use crate::error::Result;
use crate::geometry::{BezierCurve, BoundingBox, ParameterInterval};
use crate::math::TOLERANCE;
use crate::operations::modification::{CurveBuilder, StandardBuilder};

use super::intersect::{merge_hits, ordered, pair_iteration, IntersectOptions, IntersectionPair};

/// One boundary edge of a segment shape.
#[derive(Debug)]
struct Edge {
    curve: BezierCurve,
    /// Caps added only to close the shape never report hits.
    synthetic: bool,
}

impl Edge {
    fn real(curve: BezierCurve) -> Self {
        Self {
            curve,
            synthetic: false,
        }
    }

    fn cap(curve: BezierCurve) -> Self {
        Self {
            curve,
            synthetic: true,
        }
    }
}

/// Closed outline around one simple segment: start cap, forward half,
/// end cap and the reversed back half.
#[derive(Debug)]
struct SegmentShape {
    edges: Vec<Edge>,
    bbox: BoundingBox,
}

impl SegmentShape {
    fn build(segment: &BezierCurve, builder: &impl CurveBuilder) -> Result<Self> {
        let halves = segment.split(0.5);
        let forward = halves.left;
        let back = halves.right.reversed();
        let dimension = segment.dimension();
        let start_cap = builder.connector(back.end(), forward.start(), dimension)?;
        let end_cap = builder.connector(forward.end(), back.start(), dimension)?;

        let edges = vec![
            Edge::cap(start_cap),
            Edge::real(forward),
            Edge::cap(end_cap),
            Edge::real(back),
        ];
        let bbox = edges
            .iter()
            .map(|e| e.curve.bbox())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| segment.bbox());
        Ok(Self { edges, bbox })
    }

    fn real_edges(&self) -> impl Iterator<Item = &BezierCurve> {
        self.edges.iter().filter(|e| !e.synthetic).map(|e| &e.curve)
    }
}

/// Finds where a curve crosses itself.
///
/// The curve is cut into simple segments by the builder; no simple
/// segment can cross itself, so each segment's outline is tested only
/// against the outlines of non-adjacent segments. Reported pairs satisfy
/// `t_a <= t_b`.
#[derive(Debug)]
pub struct SelfIntersect<'a, B: CurveBuilder = StandardBuilder> {
    curve: &'a BezierCurve,
    builder: B,
    options: IntersectOptions,
}

impl<'a> SelfIntersect<'a, StandardBuilder> {
    /// Creates a new self-intersection query using the standard builder.
    #[must_use]
    pub fn new(curve: &'a BezierCurve) -> Self {
        Self {
            curve,
            builder: StandardBuilder,
            options: IntersectOptions::default(),
        }
    }
}

impl<'a, B: CurveBuilder> SelfIntersect<'a, B> {
    /// Replaces the curve builder.
    #[must_use]
    pub fn builder<C: CurveBuilder>(self, builder: C) -> SelfIntersect<'a, C> {
        SelfIntersect {
            curve: self.curve,
            builder,
            options: self.options,
        }
    }

    /// Replaces the search options.
    #[must_use]
    pub fn options(mut self, options: IntersectOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns `BezelError::InvalidParameter` for malformed options and
    /// propagates reduction and search failures.
    pub fn execute(&self) -> Result<Vec<IntersectionPair>> {
        self.options.validate()?;
        let mut curve = self.curve.clone();
        curve.set_interval(ParameterInterval::UNIT);

        let segments = self.builder.simple_segments(&curve)?;
        let shapes = segments
            .iter()
            .map(|s| SegmentShape::build(s, &self.builder))
            .collect::<Result<Vec<_>>>()?;

        let mut hits = Vec::new();
        for i in 0..shapes.len() {
            for j in (i + 2)..shapes.len() {
                if !shapes[i].bbox.overlaps_within(&shapes[j].bbox, TOLERANCE) {
                    continue;
                }
                for a in shapes[i].real_edges() {
                    for b in shapes[j].real_edges() {
                        hits.extend(pair_iteration(a, b, &self.options)?);
                    }
                }
            }
        }

        let pairs = merge_hits(ordered(hits));
        debug!(
            segments = segments.len(),
            crossings = pairs.len(),
            "self-intersection search finished"
        );
        Ok(pairs)
    }
}
