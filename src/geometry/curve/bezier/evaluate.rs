use std::f64::consts::FRAC_PI_3;

use crate::error::{BezelError, Result};
use crate::math::align::signed_angle;
use crate::math::{gauss, in_unit_interval, lerp, Point3, Vector3, TOLERANCE};

use super::BezierCurve;

/// Parameter offset for the finite-difference estimate of `dk`.
const CURVATURE_STEP: f64 = 0.001;

/// Look-ahead used to find the osculating plane of a spatial curve.
const NORMAL_LOOK_AHEAD: f64 = 0.01;

/// Curvature at a parameter.
///
/// `k` is signed for planar curves and unsigned for spatial ones. `dk` and
/// `adk` are symmetric finite-difference estimates of its rate of change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Curvature {
    pub k: f64,
    /// Radius of curvature, `1 / k`; zero where the curve is straight.
    pub r: f64,
    pub dk: f64,
    pub adk: f64,
}

/// A point offset from the curve along its normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetPoint {
    /// The offset point, `curve_point + distance * normal`.
    pub point: Point3,
    /// Unit normal at `t`.
    pub normal: Vector3,
    /// The on-curve point at `t`.
    pub curve_point: Point3,
    pub t: f64,
    pub distance: f64,
}

/// Evaluates the Bezier curve with control points `points` at `t`.
///
/// Orders up to 3 use the Bernstein closed form, higher orders fall back to
/// de Casteljau. `t = 0` and `t = 1` return the end points exactly.
pub(crate) fn compute_points(t: f64, points: &[Point3]) -> Point3 {
    let order = points.len() - 1;
    if t == 0.0 {
        return points[0];
    }
    if t == 1.0 {
        return points[order];
    }

    let mt = 1.0 - t;
    match *points {
        [p0] => p0,
        [p0, p1] => lerp(t, &p0, &p1),
        [p0, p1, p2] => {
            let (a, b, c) = (mt * mt, 2.0 * mt * t, t * t);
            Point3::from(p0.coords * a + p1.coords * b + p2.coords * c)
        }
        [p0, p1, p2, p3] => {
            let mt2 = mt * mt;
            let t2 = t * t;
            let (a, b, c, d) = (mt2 * mt, 3.0 * mt2 * t, 3.0 * mt * t2, t2 * t);
            Point3::from(p0.coords * a + p1.coords * b + p2.coords * c + p3.coords * d)
        }
        _ => de_casteljau(t, points),
    }
}

/// Generic de Casteljau evaluation: repeated lerping of adjacent points.
pub(crate) fn de_casteljau(t: f64, points: &[Point3]) -> Point3 {
    let mut work = points.to_vec();
    while work.len() > 1 {
        for i in 0..work.len() - 1 {
            work[i] = lerp(t, &work[i], &work[i + 1]);
        }
        work.pop();
    }
    work[0]
}

/// Rational evaluation: weighted Bernstein terms divided by their sum.
///
/// Only orders 1 to 3 carry weights.
fn compute_rational(t: f64, points: &[Point3], weights: &[f64]) -> Point3 {
    let mt = 1.0 - t;
    let basis: Vec<f64> = match points.len() {
        2 => vec![mt, t],
        3 => vec![mt * mt, 2.0 * mt * t, t * t],
        _ => vec![mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t],
    };
    let mut sum = Vector3::zeros();
    let mut denom = 0.0;
    for ((p, w), b) in points.iter().zip(weights).zip(basis) {
        let f = w * b;
        sum += p.coords * f;
        denom += f;
    }
    Point3::from(sum / denom)
}

/// Builds the derivative hierarchy of `points`: `n * (p[i + 1] - p[i])` for
/// order `n`, repeated until fewer than two points remain.
pub(crate) fn derive(points: &[Point3]) -> Vec<Vec<Point3>> {
    let mut levels = Vec::with_capacity(points.len().saturating_sub(1));
    let mut current = points.to_vec();
    while current.len() > 1 {
        #[allow(clippy::cast_precision_loss)]
        let c = (current.len() - 1) as f64;
        let next: Vec<Point3> = current
            .windows(2)
            .map(|w| Point3::from((w[1] - w[0]) * c))
            .collect();
        levels.push(next.clone());
        current = next;
    }
    levels
}

impl BezierCurve {
    /// Point on the curve at `t`.
    ///
    /// Exact at `t = 0` and `t = 1`. Parameters outside `[0, 1]` extrapolate
    /// the polynomial.
    #[must_use]
    pub fn compute(&self, t: f64) -> Point3 {
        match self.weights() {
            Some(_) if t == 0.0 => *self.start(),
            Some(_) if t == 1.0 => *self.end(),
            Some(w) => compute_rational(t, self.points(), w),
            None => compute_points(t, self.points()),
        }
    }

    /// Point on the curve at `t` via de Casteljau, ignoring weights.
    #[must_use]
    pub fn compute_generic(&self, t: f64) -> Point3 {
        de_casteljau(t, self.points())
    }

    /// First derivative at `t`.
    ///
    /// Derivative queries use the control polygon, so weights do not
    /// contribute.
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector3 {
        self.level_at(0, t)
    }

    /// Second derivative at `t`; zero for linear-order curves.
    #[must_use]
    pub fn second_derivative(&self, t: f64) -> Vector3 {
        self.level_at(1, t)
    }

    fn level_at(&self, level: usize, t: f64) -> Vector3 {
        self.derivative_level(level)
            .map_or_else(Vector3::zeros, |points| compute_points(t, &points).coords)
    }

    /// The first non-vanishing derivative at `t`.
    ///
    /// A cusp or a stack of coincident control points zeroes the first
    /// derivative while higher ones still point along the curve.
    pub(crate) fn leading_derivative(&self, t: f64) -> Result<Vector3> {
        (0..self.order())
            .map(|level| self.level_at(level, t))
            .find(|d| d.norm() > TOLERANCE)
            .ok_or_else(|| {
                BezelError::InvalidCurve("all derivatives vanish, curve is a point".into())
            })
    }

    /// Curvature at `t`.
    ///
    /// Returns `k = 0, r = 0` where the curve is straight or degenerate.
    #[must_use]
    pub fn curvature(&self, t: f64) -> Curvature {
        let k = self.curvature_k(t);
        if k == 0.0 {
            return Curvature::default();
        }
        let pk = self.curvature_k(t - CURVATURE_STEP);
        let nk = self.curvature_k(t + CURVATURE_STEP);
        Curvature {
            k,
            r: 1.0 / k,
            dk: ((nk - k) + (k - pk)) / 2.0,
            adk: ((nk - k).abs() + (k - pk).abs()) / 2.0,
        }
    }

    fn curvature_k(&self, t: f64) -> f64 {
        let d = self.derivative(t);
        let dd = self.second_derivative(t);
        let (num, dnm) = if self.is_spatial() {
            (d.cross(&dd).norm(), d.norm().powi(3))
        } else {
            (
                d.x * dd.y - d.y * dd.x,
                (d.x * d.x + d.y * d.y).powf(1.5),
            )
        };
        // Zero only up to roundoff, which scales with |d| |dd|, never with size.
        if dnm == 0.0 || num.abs() <= f64::EPSILON * d.norm() * dd.norm() {
            return 0.0;
        }
        num / dnm
    }

    /// Unit normal at `t`.
    ///
    /// Planar curves rotate the tangent a quarter turn. Spatial curves
    /// rotate it about the axis through the tangents at `t` and slightly
    /// ahead of `t`; straight spatial curves get an arbitrary perpendicular.
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::InvalidCurve`] if every derivative vanishes.
    pub fn normal(&self, t: f64) -> Result<Vector3> {
        let d = self.leading_derivative(t)?.normalize();
        if !self.is_spatial() {
            return Ok(Vector3::new(-d.y, d.x, 0.0));
        }
        let ahead = self
            .leading_derivative(t + NORMAL_LOOK_AHEAD)
            .map_or(d, |v| v.normalize());
        let axis = ahead.cross(&d);
        if axis.norm() < TOLERANCE {
            return Ok(any_perpendicular(&d));
        }
        Ok(axis.normalize().cross(&d))
    }

    /// The point at distance `distance` from the curve along the normal at
    /// `t`.
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::ParameterOutOfRange`] for `t` outside `[0, 1]`
    /// and [`BezelError::InvalidCurve`] where no normal exists.
    pub fn offset_point(&self, t: f64, distance: f64) -> Result<OffsetPoint> {
        if !in_unit_interval(t) {
            return Err(BezelError::t_out_of_range(t));
        }
        let curve_point = self.compute(t);
        let normal = self.normal(t)?;
        Ok(OffsetPoint {
            point: curve_point + normal * distance,
            normal,
            curve_point,
            t,
            distance,
        })
    }

    /// Whether the curve can be offset in one piece: a cubic's interior
    /// control points lie on the same side of the chord, and the end normals
    /// differ by less than 60 degrees.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        if let [p0, p1, p2, p3] = self.points() {
            let a1 = signed_angle(p0, p3, p1);
            let a2 = signed_angle(p0, p3, p2);
            if (a1 > 0.0 && a2 < 0.0) || (a1 < 0.0 && a2 > 0.0) {
                return false;
            }
        }
        let (Ok(n1), Ok(n2)) = (self.normal(0.0), self.normal(1.0)) else {
            return false;
        };
        n1.dot(&n2).clamp(-1.0, 1.0).acos() < FRAC_PI_3
    }

    /// Arc length by 24-point Legendre-Gauss quadrature of the speed.
    #[must_use]
    pub fn length(&self) -> f64 {
        gauss::integrate_unit(|t| self.derivative(t).norm())
    }
}

/// A unit vector perpendicular to the unit vector `v`.
fn any_perpendicular(v: &Vector3) -> Vector3 {
    let helper = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&helper).normalize()
}
