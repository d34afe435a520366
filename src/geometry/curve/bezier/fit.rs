use nalgebra::Vector4;

use crate::error::{BezelError, Result};
use crate::geometry::point::{Dimension, Point};
use crate::geometry::ParameterInterval;
use crate::math::align::align_to_baseline;
use crate::math::{Point3, TOLERANCE};

use super::BezierCurve;

/// The A/B/C construction for a curve through `s`, `b`, `e`.
///
/// `b` is the on-curve point at `t`, `a` the matching hull point and `c` the
/// projection of `b` onto the chord `s e`. The ratio between `a`, `b` and
/// `c` depends only on `t` and the order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Abc {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
    pub s: Point3,
    pub e: Point3,
}

/// Position of `c` along the chord, as the weight of the start point.
fn projection_ratio(t: f64, order: usize) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let top = (1.0 - t).powi(order_exp(order));
    let bottom = t.powi(order_exp(order)) + top;
    top / bottom
}

/// `|b - a| / |c - b|` for the A/B/C construction.
fn abc_ratio(t: f64, order: usize) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let bottom = t.powi(order_exp(order)) + (1.0 - t).powi(order_exp(order));
    let top = bottom - 1.0;
    (top / bottom).abs()
}

fn order_exp(order: usize) -> i32 {
    if order == 2 {
        2
    } else {
        3
    }
}

impl Abc {
    /// Builds the construction for a quadratic (`order = 2`) or cubic
    /// (`order = 3`).
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::InvalidParameter`] for other orders or for `t`
    /// outside the open interval `(0, 1)`.
    pub fn new(order: usize, s: &Point3, b: &Point3, e: &Point3, t: f64) -> Result<Self> {
        if order != 2 && order != 3 {
            return Err(BezelError::InvalidParameter(format!(
                "A/B/C construction needs order 2 or 3, got {order}"
            )));
        }
        if !(t > 0.0 && t < 1.0) {
            return Err(BezelError::InvalidParameter(format!(
                "A/B/C construction needs 0 < t < 1, got {t}"
            )));
        }
        let u = projection_ratio(t, order);
        let c = Point3::from(s.coords * u + e.coords * (1.0 - u));
        let ratio = abc_ratio(t, order);
        let a = b + (b - c) / ratio;
        Ok(Self {
            a,
            b: *b,
            c,
            s: *s,
            e: *e,
        })
    }
}

impl BezierCurve {
    /// The A/B/C construction for this quadratic or cubic at `t`.
    ///
    /// # Errors
    ///
    /// See [`Abc::new`].
    pub fn abc(&self, t: f64) -> Result<Abc> {
        Abc::new(self.order(), self.start(), &self.compute(t), self.end(), t)
    }

    /// Quadratic through `p1`, `p2` and `p3`, passing `p2` at parameter `t`.
    ///
    /// `t = 0` and `t = 1` degenerate to curves with a doubled point.
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::InvalidParameter`] for `t` outside `[0, 1]`.
    pub fn quadratic_through(p1: Point, p2: Point, p3: Point, t: f64) -> Result<Self> {
        if t == 0.0 {
            return Self::new(vec![p2, p2, p3]);
        }
        if t == 1.0 {
            return Self::new(vec![p1, p2, p2]);
        }
        let dimension = dimension_of(&[p1, p2, p3]);
        let abc = Abc::new(2, &p1.to_point3(), &p2.to_point3(), &p3.to_point3(), t)?;
        Self::new(vec![p1, dimension.wrap(abc.a), p3])
    }

    /// Cubic from `s` to `e` passing `b` at parameter `t`.
    ///
    /// `d1` is the distance from `b` to the first de Casteljau strut
    /// endpoint; it defaults to `|b - c|` from the A/B/C construction.
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::InvalidParameter`] for `t` outside `(0, 1)` and
    /// [`BezelError::InvalidCurve`] when `s` and `e` coincide.
    pub fn cubic_through(s: Point, b: Point, e: Point, t: f64, d1: Option<f64>) -> Result<Self> {
        let dimension = dimension_of(&[s, b, e]);
        let (sp, bp, ep) = (s.to_point3(), b.to_point3(), e.to_point3());
        let abc = Abc::new(3, &sp, &bp, &ep, t)?;
        let d1 = d1.unwrap_or_else(|| nalgebra::distance(&bp, &abc.c));
        let d2 = d1 * (1.0 - t) / t;

        let chord = ep - sp;
        let selen = chord.norm();
        if selen < TOLERANCE {
            return Err(BezelError::InvalidCurve(
                "cubic fit needs distinct start and end points".into(),
            ));
        }
        let dir = chord / selen;

        let e1 = bp - dir * d1;
        let e2 = bp + dir * d2;
        let a = abc.a;
        let v1 = a + (e1 - a) / (1.0 - t);
        let v2 = a + (e2 - a) / t;
        let nc1 = sp + (v1 - sp) / t;
        let nc2 = ep + (v2 - ep) / (1.0 - t);

        Self::new(vec![s, dimension.wrap(nc1), dimension.wrap(nc2), e])
    }

    /// Degree elevation: the same curve with one more control point.
    ///
    /// # Errors
    ///
    /// Returns [`BezelError::InvalidCurve`] for rational cubics, whose
    /// elevation would exceed the order supported for weights.
    pub fn raise(&self) -> Result<BezierCurve> {
        if self.is_rational() && self.order() >= 3 {
            return Err(BezelError::InvalidCurve(
                "rational curves cannot be raised beyond order 3".into(),
            ));
        }
        let weights = self.weights();
        let h: Vec<Vector4<f64>> = self
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let w = weights.map_or(1.0, |w| w[i]);
                Vector4::new(p.x * w, p.y * w, p.z * w, w)
            })
            .collect();
        let k = h.len();
        #[allow(clippy::cast_precision_loss)]
        let kf = k as f64;
        let mut raised = Vec::with_capacity(k + 1);
        raised.push(h[0]);
        for i in 1..k {
            #[allow(clippy::cast_precision_loss)]
            let fi = i as f64;
            raised.push(h[i] * ((kf - fi) / kf) + h[i - 1] * (fi / kf));
        }
        raised.push(h[k - 1]);

        let points = raised
            .iter()
            .map(|v| Point3::new(v.x / v.w, v.y / v.w, v.z / v.w))
            .collect();
        let weights = self
            .is_rational()
            .then(|| raised.iter().map(|v| v.w).collect());
        Ok(Self::from_parts(points, self.dimension(), weights, self.interval()))
    }

    /// The curve rotated and translated so its chord lies on the positive
    /// x-axis starting at the origin. Rotation is about z.
    #[must_use]
    pub fn aligned(&self) -> BezierCurve {
        let points = align_to_baseline(self.points(), self.start(), self.end());
        Self::from_parts(
            points,
            self.dimension(),
            self.weights().map(<[f64]>::to_vec),
            ParameterInterval::UNIT,
        )
    }
}

fn dimension_of(points: &[Point]) -> Dimension {
    if points.iter().any(|p| p.dimension() == Dimension::Spatial) {
        Dimension::Spatial
    } else {
        Dimension::Planar
    }
}
