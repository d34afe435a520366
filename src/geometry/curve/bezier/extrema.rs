use crate::geometry::point::Dimension;
use crate::math::align::align_to_baseline;
use crate::math::roots::{bracketed_roots, derivative_roots};
use crate::math::{approximately, in_unit_interval, Point3, TOLERANCE};

use super::BezierCurve;

/// Sample count used to bracket derivative roots of order 4+ curves.
const BRACKET_SAMPLES: u32 = 64;

/// Per-axis derivative roots in `[0, 1]`, plus their sorted union.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extrema {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Present for spatial curves only.
    pub z: Option<Vec<f64>>,
    /// All roots, sorted and deduplicated.
    pub values: Vec<f64>,
}

impl Extrema {
    /// Roots for axis `0`, `1` or `2`.
    #[must_use]
    pub fn axis(&self, axis: usize) -> Option<&[f64]> {
        match axis {
            0 => Some(&self.x),
            1 => Some(&self.y),
            2 => self.z.as_deref(),
            _ => None,
        }
    }
}

/// Extent of a bounding box along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: f64,
    pub mid: f64,
    pub max: f64,
    pub size: f64,
}

impl AxisBounds {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            mid: 0.5 * (min + max),
            max,
            size: max - min,
        }
    }

    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        Self::new(min, max)
    }

    fn union(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    fn separated(&self, other: &Self, tolerance: f64) -> bool {
        (self.mid - other.mid).abs() > 0.5 * (self.size + other.size) + tolerance
    }
}

/// Axis-aligned bounding box of a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: AxisBounds,
    pub y: AxisBounds,
    /// Present for spatial curves only.
    pub z: Option<AxisBounds>,
}

impl BoundingBox {
    /// Bounds of a point set. An empty set yields inverted infinite bounds.
    #[must_use]
    pub fn from_points(points: &[Point3], dimension: Dimension) -> Self {
        Self {
            x: AxisBounds::from_values(points.iter().map(|p| p.x)),
            y: AxisBounds::from_values(points.iter().map(|p| p.y)),
            z: (dimension == Dimension::Spatial)
                .then(|| AxisBounds::from_values(points.iter().map(|p| p.z))),
        }
    }

    fn axes(&self) -> impl Iterator<Item = &AxisBounds> {
        [Some(&self.x), Some(&self.y), self.z.as_ref()].into_iter().flatten()
    }

    /// Strict overlap: on every shared axis the center distance is less than
    /// the sum of the half extents. Touching boxes do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.pairs(other)
            .all(|(a, b)| (a.mid - b.mid).abs() < 0.5 * (a.size + b.size))
    }

    /// Overlap test that also accepts boxes separated by at most `tolerance`.
    #[must_use]
    pub fn overlaps_within(&self, other: &Self, tolerance: f64) -> bool {
        self.pairs(other).all(|(a, b)| !a.separated(b, tolerance))
    }

    fn pairs<'a>(
        &'a self,
        other: &'a Self,
    ) -> impl Iterator<Item = (&'a AxisBounds, &'a AxisBounds)> {
        let z = self.z.as_ref().zip(other.z.as_ref());
        [(&self.x, &other.x), (&self.y, &other.y)].into_iter().chain(z)
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            x: self.x.union(&other.x),
            y: self.y.union(&other.y),
            z: match (self.z, other.z) {
                (Some(a), Some(b)) => Some(a.union(&b)),
                (a, b) => a.or(b),
            },
        }
    }

    /// Sum of the extents along every axis.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.axes().map(|a| a.size).sum()
    }
}

impl BezierCurve {
    /// Parameters in `[0, 1]` where a coordinate's derivative vanishes.
    ///
    /// Cubics also report the roots of the second derivative. Curves of
    /// order 4 and higher bracket the first derivative's sign changes.
    #[must_use]
    pub fn extrema(&self) -> Extrema {
        let derivatives = self.derivatives();
        let axis_roots = |axis: usize| -> Vec<f64> {
            let coords =
                |level: &[Point3]| -> Vec<f64> { level.iter().map(|p| p[axis]).collect() };
            let Some(first) = derivatives.first() else {
                return Vec::new();
            };
            let mut roots = if first.len() > 3 {
                bracketed_roots(&coords(first), BRACKET_SAMPLES)
            } else {
                derivative_roots(&coords(first))
            };
            if self.order() == 3 {
                roots.extend(derivative_roots(&coords(&derivatives[1])));
            }
            roots.retain(|t| in_unit_interval(*t));
            sort_dedup(&mut roots);
            roots
        };

        let x = axis_roots(0);
        let y = axis_roots(1);
        let z = self.is_spatial().then(|| axis_roots(2));

        let mut values: Vec<f64> = x.iter().chain(&y).chain(z.iter().flatten()).copied().collect();
        sort_dedup(&mut values);
        Extrema { x, y, z, values }
    }

    /// Inflection parameters of a cubic, in `[0, 1]`.
    ///
    /// The curve is aligned to its chord and the XY projection is used.
    /// Other orders have none.
    #[must_use]
    pub fn inflections(&self) -> Vec<f64> {
        if self.order() != 3 {
            return Vec::new();
        }
        let p = align_to_baseline(self.points(), self.start(), self.end());
        let a = p[2].x * p[1].y;
        let b = p[3].x * p[1].y;
        let c = p[1].x * p[2].y;
        let d = p[3].x * p[2].y;
        let v1 = 18.0 * (-3.0 * a + 2.0 * b + 3.0 * c - d);
        let v2 = 18.0 * (3.0 * a - b - 3.0 * c);
        let v3 = 18.0 * (c - a);

        if approximately(v1, 0.0) {
            if approximately(v2, 0.0) {
                return Vec::new();
            }
            let t = -v3 / v2;
            return if in_unit_interval(t) { vec![t] } else { Vec::new() };
        }

        let d2 = 2.0 * v1;
        let trm = v2 * v2 - 4.0 * v1 * v3;
        if trm < 0.0 {
            return Vec::new();
        }
        let sq = trm.sqrt();
        let mut roots: Vec<f64> = [(sq - v2) / d2, -(v2 + sq) / d2]
            .into_iter()
            .filter(|t| in_unit_interval(*t))
            .collect();
        sort_dedup(&mut roots);
        roots
    }

    /// Axis-aligned bounding box.
    ///
    /// Polynomial curves are sampled at `{0, 1}` and their extrema, which is
    /// exact. Rational curves use their control-point bounds.
    #[must_use]
    pub fn bbox(&self) -> BoundingBox {
        if self.is_rational() {
            return BoundingBox::from_points(self.points(), self.dimension());
        }
        let extrema = self.extrema();
        let bounds = |axis: usize, roots: &[f64]| {
            AxisBounds::from_values(
                [0.0, 1.0]
                    .iter()
                    .chain(roots)
                    .map(|&t| self.compute(t)[axis]),
            )
        };
        BoundingBox {
            x: bounds(0, &extrema.x),
            y: bounds(1, &extrema.y),
            z: extrema.z.as_deref().map(|roots| bounds(2, roots)),
        }
    }

    /// Whether the bounding boxes of the two curves overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.bbox().overlaps(&other.bbox())
    }
}

fn sort_dedup(values: &mut Vec<f64>) {
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{planar, spatial};
    use approx::assert_abs_diff_eq;

    fn dense_bbox(curve: &BezierCurve) -> BoundingBox {
        let samples: Vec<Point3> = (0..=1000)
            .map(|i| curve.compute(f64::from(i) / 1000.0))
            .collect();
        BoundingBox::from_points(&samples, curve.dimension())
    }

    fn assert_bbox_close(a: &BoundingBox, b: &BoundingBox, eps: f64) {
        for (x, y) in a.axes().zip(b.axes()) {
            assert_abs_diff_eq!(x.min, y.min, epsilon = eps);
            assert_abs_diff_eq!(x.max, y.max, epsilon = eps);
        }
    }

    #[test]
    fn quadratic_extrema() {
        let c = planar(&[(0.0, 0.0), (50.0, 100.0), (100.0, 0.0)]);
        let e = c.extrema();
        assert!(e.x.is_empty());
        assert_eq!(e.y.len(), 1);
        assert_abs_diff_eq!(e.y[0], 0.5, epsilon = 1e-12);
        assert_eq!(e.values, e.y);
        assert!(e.z.is_none());
    }

    #[test]
    fn cubic_extrema_include_second_derivative_roots() {
        let c = planar(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0)]);
        let e = c.extrema();
        // y'(t) has a root at 0.5; x''(t) and y''(t) vanish at 0.5 too.
        assert!(e.y.iter().any(|t| (t - 0.5).abs() < 1e-12));
        assert!(e.values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn bbox_matches_dense_sampling() {
        let curves = [
            planar(&[(0.0, 0.0), (120.0, -40.0), (30.0, 90.0)]),
            planar(&[(10.0, 10.0), (-50.0, 200.0), (150.0, -100.0), (90.0, 40.0)]),
            spatial(&[
                (0.0, 0.0, 0.0),
                (40.0, 80.0, -60.0),
                (-20.0, 10.0, 90.0),
                (60.0, 30.0, 10.0),
            ]),
            planar(&[(0.0, 0.0), (10.0, 60.0), (40.0, -60.0), (70.0, 60.0), (100.0, 0.0)]),
        ];
        for c in &curves {
            let exact = c.bbox();
            let sampled = dense_bbox(c);
            assert_bbox_close(&exact, &sampled, 1e-2);
            // Exact bounds always contain the samples.
            assert!(exact.x.min <= sampled.x.min + 1e-9 && exact.x.max >= sampled.x.max - 1e-9);
        }
    }

    #[test]
    fn rational_bbox_contains_curve() {
        let c = planar(&[(1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
            .with_weights(vec![1.0, 0.5, 1.0])
            .unwrap();
        let b = c.bbox();
        for i in 0..=100 {
            let p = c.compute(f64::from(i) / 100.0);
            assert!(p.x >= b.x.min && p.x <= b.x.max);
            assert!(p.y >= b.y.min && p.y <= b.y.max);
        }
    }

    #[test]
    fn overlap_is_strict() {
        let a = BoundingBox::from_points(
            &[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0)],
            Dimension::Planar,
        );
        let touching = BoundingBox::from_points(
            &[Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 0.0)],
            Dimension::Planar,
        );
        let inside = BoundingBox::from_points(
            &[Point3::new(0.5, 0.5, 0.0), Point3::new(0.6, 0.6, 0.0)],
            Dimension::Planar,
        );
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps_within(&touching, TOLERANCE));
        assert!(a.overlaps(&inside));
        let u = a.union(&touching);
        assert_abs_diff_eq!(u.x.size, 2.0);
        assert_abs_diff_eq!(u.extent(), 3.0);
    }

    #[test]
    fn spatial_boxes_compare_z() {
        let a = spatial(&[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)]);
        let b = spatial(&[(0.0, 0.0, 5.0), (1.0, 1.0, 6.0)]);
        assert!(!a.overlaps(&b));
        assert_abs_diff_eq!(a.bbox().extent(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn s_curve_inflection() {
        let c = planar(&[(0.0, 0.0), (30.0, 100.0), (70.0, -100.0), (100.0, 0.0)]);
        let inf = c.inflections();
        assert_eq!(inf.len(), 1);
        assert_abs_diff_eq!(inf[0], 0.5, epsilon = 1e-9);
        let arch = planar(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0)]);
        assert!(arch.inflections().is_empty());
        assert!(planar(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).inflections().is_empty());
    }
}
