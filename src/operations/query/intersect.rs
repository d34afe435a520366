use tracing::{debug, trace, warn};

use crate::error::{BezelError, Result};
use crate::geometry::{BezierCurve, BoundingBox, ParameterInterval};
use crate::math::TOLERANCE;

/// Default bounding-box size below which a pair of curves counts as a hit.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Default number of curve pairs a single search may visit.
pub const DEFAULT_PAIR_BUDGET: usize = 250_000;

/// Hits are deduplicated on parameters rounded to this many decimals.
const DEDUP_SCALE: f64 = 1e5;

/// Tuning for the subdivision search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectOptions {
    /// Sum of bounding-box extents below which both curves are treated as
    /// a single point. Smaller values give more precise parameters and a
    /// deeper search.
    pub threshold: f64,
    /// Upper bound on visited curve pairs before the search gives up.
    pub pair_budget: usize,
}

impl Default for IntersectOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            pair_budget: DEFAULT_PAIR_BUDGET,
        }
    }
}

impl IntersectOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(BezelError::InvalidParameter(format!(
                "intersection threshold must be positive and finite, got {}",
                self.threshold
            )));
        }
        if self.pair_budget == 0 {
            return Err(BezelError::InvalidParameter(
                "intersection pair budget must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A crossing of two curves, as a parameter on each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionPair {
    pub t_a: f64,
    pub t_b: f64,
}

/// Raw search hit: the leaf interval midpoints and their widths.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Hit {
    pub t_a: f64,
    pub t_b: f64,
    pub width_a: f64,
    pub width_b: f64,
}

impl Hit {
    fn near(&self, other: &Self) -> bool {
        let wa = self.width_a.max(other.width_a) * (1.0 + 1e-9);
        let wb = self.width_b.max(other.width_b) * (1.0 + 1e-9);
        (self.t_a - other.t_a).abs() <= wa && (self.t_b - other.t_b).abs() <= wb
    }

    fn swapped(self) -> Self {
        Self {
            t_a: self.t_b,
            t_b: self.t_a,
            width_a: self.width_b,
            width_b: self.width_a,
        }
    }
}

/// Finds where two curves cross by recursive bounding-box subdivision.
///
/// Both curves are halved until each fits in a box smaller than the
/// threshold; pairs whose boxes are apart are pruned. Parameters are
/// reported in each input curve's own `[0, 1]` space.
#[derive(Debug)]
pub struct CurveIntersect<'a> {
    a: &'a BezierCurve,
    b: &'a BezierCurve,
    options: IntersectOptions,
}

impl<'a> CurveIntersect<'a> {
    /// Creates a new intersection query between `a` and `b`.
    #[must_use]
    pub fn new(a: &'a BezierCurve, b: &'a BezierCurve) -> Self {
        Self {
            a,
            b,
            options: IntersectOptions::default(),
        }
    }

    /// Replaces the search options.
    #[must_use]
    pub fn options(mut self, options: IntersectOptions) -> Self {
        self.options = options;
        self
    }

    /// Shorthand for changing only the threshold.
    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Executes the query, returning crossings sorted by `t_a`.
    ///
    /// # Errors
    ///
    /// Returns `BezelError::InvalidParameter` for a non-positive or
    /// non-finite threshold, or `BezelError::ComputationFailed` if the
    /// search visits more pairs than the budget allows.
    pub fn execute(&self) -> Result<Vec<IntersectionPair>> {
        self.options.validate()?;
        let mut a = self.a.clone();
        let mut b = self.b.clone();
        a.set_interval(ParameterInterval::UNIT);
        b.set_interval(ParameterInterval::UNIT);
        let hits = pair_iteration(&a, &b, &self.options)?;
        Ok(merge_hits(hits))
    }
}

#[derive(Debug, Clone)]
struct Node {
    curve: BezierCurve,
    bbox: BoundingBox,
}

impl Node {
    fn new(curve: BezierCurve) -> Self {
        let bbox = curve.bbox();
        Self { curve, bbox }
    }

    fn halves(&self) -> [Node; 2] {
        let split = self.curve.split(0.5);
        [Node::new(split.left), Node::new(split.right)]
    }
}

/// Runs the subdivision search on one curve pair.
///
/// Hit parameters are the leaf midpoints mapped through each curve's
/// interval, i.e. relative to the curves' common ancestor.
pub(crate) fn pair_iteration(
    a: &BezierCurve,
    b: &BezierCurve,
    options: &IntersectOptions,
) -> Result<Vec<Hit>> {
    let mut stack = vec![(Node::new(a.clone()), Node::new(b.clone()))];
    let mut hits = Vec::new();
    let mut visited = 0usize;

    while let Some((na, nb)) = stack.pop() {
        visited += 1;
        if visited > options.pair_budget {
            warn!(
                budget = options.pair_budget,
                hits = hits.len(),
                "intersection search exhausted its pair budget"
            );
            return Err(BezelError::ComputationFailed(format!(
                "intersection search visited more than {} curve pairs",
                options.pair_budget
            )));
        }
        if !na.bbox.overlaps_within(&nb.bbox, TOLERANCE) {
            continue;
        }
        if na.bbox.extent() < options.threshold && nb.bbox.extent() < options.threshold {
            let (ia, ib) = (na.curve.interval(), nb.curve.interval());
            trace!(t_a = ia.midpoint(), t_b = ib.midpoint(), "leaf hit");
            hits.push(Hit {
                t_a: ia.midpoint(),
                t_b: ib.midpoint(),
                width_a: ia.width(),
                width_b: ib.width(),
            });
            continue;
        }
        let [a0, a1] = na.halves();
        let [b0, b1] = nb.halves();
        for (ca, cb) in [(&a0, &b0), (&a0, &b1), (&a1, &b0), (&a1, &b1)] {
            if ca.bbox.overlaps_within(&cb.bbox, TOLERANCE) {
                stack.push((ca.clone(), cb.clone()));
            }
        }
    }

    debug!(visited, raw = hits.len(), "intersection search finished");
    Ok(hits)
}

/// Collapses neighbouring leaf cells into one crossing each.
///
/// Hits within one leaf width of each other on both curves describe the
/// same crossing. Clustering runs on the raw midpoints and is transitive;
/// only the cluster means are rounded to five decimals, after which equal
/// pairs are dropped.
pub(crate) fn merge_hits(mut hits: Vec<Hit>) -> Vec<IntersectionPair> {
    let raw = hits.len();
    hits.sort_by(|x, y| x.t_a.total_cmp(&y.t_a).then(x.t_b.total_cmp(&y.t_b)));

    let mut clusters: Vec<Vec<Hit>> = Vec::new();
    for hit in hits {
        let (mut touching, rest): (Vec<_>, Vec<_>) = clusters
            .into_iter()
            .partition(|c| c.iter().any(|member| member.near(&hit)));
        clusters = rest;
        let mut merged = touching.pop().unwrap_or_default();
        for cluster in touching {
            merged.extend(cluster);
        }
        merged.push(hit);
        clusters.push(merged);
    }

    let mut pairs: Vec<IntersectionPair> = Vec::with_capacity(clusters.len());
    for cluster in &clusters {
        #[allow(clippy::cast_precision_loss)]
        let n = cluster.len() as f64;
        let pair = IntersectionPair {
            t_a: round(cluster.iter().map(|h| h.t_a).sum::<f64>() / n),
            t_b: round(cluster.iter().map(|h| h.t_b).sum::<f64>() / n),
        };
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    pairs.sort_by(|x, y| x.t_a.total_cmp(&y.t_a).then(x.t_b.total_cmp(&y.t_b)));
    trace!(raw, merged = pairs.len(), "merged intersection hits");
    pairs
}

/// Orders each hit so that `t_a <= t_b`.
pub(crate) fn ordered(hits: Vec<Hit>) -> Vec<Hit> {
    hits.into_iter()
        .map(|h| if h.t_a > h.t_b { h.swapped() } else { h })
        .collect()
}

fn round(t: f64) -> f64 {
    (t * DEDUP_SCALE).round() / DEDUP_SCALE
}
