//! Closed-form roots of degree 1, 2 and 3 polynomials in Bernstein form.
//!
//! All solvers work on Bernstein coefficients (control values) rather than
//! power-basis coefficients, because that is what derivative hierarchies and
//! aligned control points give us.

use super::align::align_to_baseline;
use super::{approximately, approximately_within, in_unit_interval, Point3, TOLERANCE};

/// Discriminants closer to zero than this take the double-root branch.
const DISCRIMINANT_EPSILON: f64 = 1e-12;

/// Root of the linear Bernstein polynomial with control values `[a, b]`.
///
/// A constant polynomial has no isolated root and yields an empty set.
#[must_use]
pub fn linear_roots(a: f64, b: f64) -> Vec<f64> {
    if (a - b).abs() < TOLERANCE {
        return Vec::new();
    }
    vec![a / (a - b)]
}

/// Roots of the quadratic Bernstein polynomial with control values
/// `[a, b, c]`.
///
/// The degenerate case is detected on `d = a - 2b + c` (the power-basis
/// leading coefficient), in which case the polynomial is linear.
#[must_use]
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    let d = a - 2.0 * b + c;
    if d.abs() > TOLERANCE {
        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return Vec::new();
        }
        let m1 = -discriminant.sqrt();
        let m2 = b - a;
        if discriminant == 0.0 {
            return vec![-m2 / d];
        }
        return vec![-(m1 + m2) / d, -(-m1 + m2) / d];
    }
    if (b - c).abs() > TOLERANCE {
        return vec![(2.0 * b - c) / (2.0 * (b - c))];
    }
    Vec::new()
}

/// Roots of a derivative coordinate sequence of length 2 or 3.
///
/// Longer sequences are not handled here; see
/// [`bracketed_roots`] for higher orders. The result is not filtered to
/// `[0, 1]`.
#[must_use]
pub fn derivative_roots(values: &[f64]) -> Vec<f64> {
    match *values {
        [a, b] => linear_roots(a, b),
        [a, b, c] => quadratic_roots(a, b, c),
        _ => Vec::new(),
    }
}

/// Parameters in `[0, 1]` where the curve with control points `points`
/// crosses the infinite line through `start` and `end`.
///
/// The points are aligned to the line first, reducing the problem to the
/// zero crossings of the aligned y-coordinates. Supports curves of order
/// 1 to 3; the cubic case falls back to quadratic, linear and finally no
/// solutions as its leading coefficients vanish.
#[must_use]
pub fn cubic_roots(points: &[Point3], start: &Point3, end: &Point3) -> Vec<f64> {
    let aligned: Vec<f64> = align_to_baseline(points, start, end)
        .iter()
        .map(|p| p.y)
        .collect();

    let roots = match *aligned.as_slice() {
        [a, b] => linear_roots(a, b),
        [a, b, c] => quadratic_roots(a, b, c),
        [pa, pb, pc, pd] => solve_cubic(pa, pb, pc, pd),
        _ => Vec::new(),
    };
    roots.into_iter().filter(|t| in_unit_interval(*t)).collect()
}

/// Solves the cubic Bernstein polynomial `[pa, pb, pc, pd]` in the power
/// basis.
fn solve_cubic(pa: f64, pb: f64, pc: f64, pd: f64) -> Vec<f64> {
    let d = -pa + 3.0 * pb - 3.0 * pc + pd;
    let mut a = 3.0 * pa - 6.0 * pb + 3.0 * pc;
    let mut b = -3.0 * pa + 3.0 * pb;
    let mut c = pa;

    if approximately(d, 0.0) {
        if approximately(a, 0.0) {
            if approximately(b, 0.0) {
                return Vec::new();
            }
            return vec![-c / b];
        }
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return Vec::new();
        }
        let q = discriminant.sqrt();
        let a2 = 2.0 * a;
        return vec![(q - b) / a2, (-b - q) / a2];
    }

    a /= d;
    b /= d;
    c /= d;

    // Depressed cubic x³ + px + q with t = x - a/3.
    let p = (3.0 * b - a * a) / 3.0;
    let p3 = p / 3.0;
    let q = (2.0 * a * a * a - 9.0 * a * b + 27.0 * c) / 27.0;
    let q2 = q / 2.0;
    let discriminant = q2 * q2 + p3 * p3 * p3;
    let shift = a / 3.0;

    if approximately_within(discriminant, 0.0, DISCRIMINANT_EPSILON) {
        let u1 = if q2 < 0.0 { (-q2).cbrt() } else { -q2.cbrt() };
        return vec![2.0 * u1 - shift, -u1 - shift];
    }

    if discriminant < 0.0 {
        // Three real roots: trigonometric form.
        let mp3 = -p / 3.0;
        let r = (mp3 * mp3 * mp3).sqrt();
        let cos_phi = (-q / (2.0 * r)).clamp(-1.0, 1.0);
        let phi = cos_phi.acos();
        let t1 = 2.0 * r.cbrt();
        let tau = std::f64::consts::TAU;
        return vec![
            t1 * (phi / 3.0).cos() - shift,
            t1 * ((phi + tau) / 3.0).cos() - shift,
            t1 * ((phi + 2.0 * tau) / 3.0).cos() - shift,
        ];
    }

    let sd = discriminant.sqrt();
    let u1 = (-q2 + sd).cbrt();
    let v1 = (q2 + sd).cbrt();
    vec![u1 - v1 - shift]
}

/// Roots in `[0, 1]` of an arbitrary-order Bernstein polynomial, found by
/// bracketing sign changes over `samples` sub-intervals and bisecting.
///
/// Used for derivative sequences longer than three values, where no closed
/// form applies.
#[must_use]
pub fn bracketed_roots(values: &[f64], samples: u32) -> Vec<f64> {
    if values.len() < 2 || samples == 0 {
        return Vec::new();
    }
    let eval = |t: f64| bernstein_value(values, t);

    let mut roots = Vec::new();
    let mut prev_t = 0.0;
    let mut prev_v = eval(prev_t);
    if prev_v == 0.0 {
        roots.push(0.0);
    }
    for i in 1..=samples {
        let t = f64::from(i) / f64::from(samples);
        let v = eval(t);
        if v == 0.0 {
            roots.push(t);
        } else if prev_v != 0.0 && prev_v.signum() != v.signum() {
            roots.push(bisect(&eval, prev_t, t, prev_v));
        }
        prev_t = t;
        prev_v = v;
    }
    roots
}

/// Evaluates a one-dimensional Bernstein polynomial by de Casteljau.
fn bernstein_value(values: &[f64], t: f64) -> f64 {
    let mut work = values.to_vec();
    while work.len() > 1 {
        for i in 0..work.len() - 1 {
            work[i] += (work[i + 1] - work[i]) * t;
        }
        work.pop();
    }
    work[0]
}

fn bisect(f: &impl Fn(f64) -> f64, mut lo: f64, mut hi: f64, mut f_lo: f64) -> f64 {
    for _ in 0..64 {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 || (hi - lo) < 1e-15 {
            return mid;
        }
        if f_lo.signum() == f_mid.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}
