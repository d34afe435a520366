use nalgebra::Vector4;

use crate::geometry::ParameterInterval;
use crate::math::{map_range, Point3};

use super::BezierCurve;

/// Result of splitting a curve at one parameter.
#[derive(Debug, Clone)]
pub struct Split {
    /// The part over `[0, t]`.
    pub left: BezierCurve,
    /// The part over `[t, 1]`.
    pub right: BezierCurve,
    /// The shared boundary point, `compute(t)` of the split curve.
    pub span: Point3,
}

impl BezierCurve {
    /// All de Casteljau construction points at `t`, level by level: the
    /// control points first, the curve point at `t` last.
    #[must_use]
    pub fn hull(&self, t: f64) -> Vec<Point3> {
        self.casteljau_levels(t)
            .into_iter()
            .flatten()
            .map(|h| project(&h))
            .collect()
    }

    /// Splits the curve at `t` into two curves of the same order.
    ///
    /// Each half records the sub-interval of the original curve's parameter
    /// space it covers, so nested splits keep reporting parameters relative
    /// to the first ancestor. Rational curves are split in homogeneous
    /// coordinates and keep their weights.
    #[must_use]
    pub fn split(&self, t: f64) -> Split {
        let levels = self.casteljau_levels(t);
        let left: Vec<Vector4<f64>> = levels.iter().filter_map(|l| l.first().copied()).collect();
        let right: Vec<Vector4<f64>> = levels
            .iter()
            .rev()
            .filter_map(|l| l.last().copied())
            .collect();
        let span = left.last().map_or(*self.start(), project);

        let interval = self.interval();
        Split {
            left: self.from_homogeneous(&left, interval.sub(0.0, t)),
            right: self.from_homogeneous(&right, interval.sub(t, 1.0)),
            span,
        }
    }

    /// The part of the curve over `[t1, t2]`.
    #[must_use]
    pub fn split_range(&self, t1: f64, t2: f64) -> BezierCurve {
        if t1 == 0.0 {
            return self.split(t2).left;
        }
        if t2 == 1.0 {
            return self.split(t1).right;
        }
        let right = self.split(t1).right;
        right.split(map_range(t2, t1, 1.0, 0.0, 1.0)).left
    }

    /// The same curve traversed from end to start.
    #[must_use]
    pub fn reversed(&self) -> BezierCurve {
        let points: Vec<Point3> = self.points().iter().rev().copied().collect();
        let weights = self.weights().map(|w| w.iter().rev().copied().collect());
        Self::from_parts(points, self.dimension(), weights, self.interval().reversed())
    }

    fn casteljau_levels(&self, t: f64) -> Vec<Vec<Vector4<f64>>> {
        let weights = self.weights();
        let mut current: Vec<Vector4<f64>> = self
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let w = weights.map_or(1.0, |w| w[i]);
                Vector4::new(p.x * w, p.y * w, p.z * w, w)
            })
            .collect();
        let mut levels = Vec::with_capacity(current.len());
        while current.len() > 1 {
            let next: Vec<Vector4<f64>> = current
                .windows(2)
                .map(|pair| pair[0] + (pair[1] - pair[0]) * t)
                .collect();
            levels.push(std::mem::replace(&mut current, next));
        }
        levels.push(current);
        levels
    }

    fn from_homogeneous(
        &self,
        points: &[Vector4<f64>],
        interval: ParameterInterval,
    ) -> BezierCurve {
        let weights = self
            .is_rational()
            .then(|| points.iter().map(|h| h.w).collect());
        Self::from_parts(
            points.iter().map(project).collect(),
            self.dimension(),
            weights,
            interval,
        )
    }
}

fn project(h: &Vector4<f64>) -> Point3 {
    Point3::new(h.x / h.w, h.y / h.w, h.z / h.w)
}
