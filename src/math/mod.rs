pub mod align;
pub mod arc_2d;
pub mod gauss;
pub mod intersect_2d;
pub mod roots;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Precision used by [`approximately`] when deciding that a polynomial
/// coefficient has vanished.
pub const EPSILON: f64 = 1e-6;

/// Returns `true` when `a` and `b` differ by at most [`EPSILON`].
#[must_use]
pub fn approximately(a: f64, b: f64) -> bool {
    approximately_within(a, b, EPSILON)
}

/// Returns `true` when `a` and `b` differ by at most `precision`.
#[must_use]
pub fn approximately_within(a: f64, b: f64, precision: f64) -> bool {
    (a - b).abs() <= precision
}

/// Returns `true` when `v` lies in `[min, max]`, or is approximately one of
/// the bounds.
#[must_use]
pub fn between(v: f64, min: f64, max: f64) -> bool {
    (min <= v && v <= max) || approximately(v, min) || approximately(v, max)
}

/// Linearly maps `v` from the range `[ds, de]` onto `[ts, te]`.
#[must_use]
pub fn map_range(v: f64, ds: f64, de: f64, ts: f64, te: f64) -> f64 {
    let ratio = (v - ds) / (de - ds);
    ts + (te - ts) * ratio
}

/// Linear interpolation between two points.
///
/// `t = 0` yields `a` exactly.
#[must_use]
pub fn lerp(t: f64, a: &Point3, b: &Point3) -> Point3 {
    a + (b - a) * t
}

/// Returns `true` if `t` lies in the unit parameter interval.
#[must_use]
pub fn in_unit_interval(t: f64) -> bool {
    (0.0..=1.0).contains(&t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_range_rescales() {
        assert!((map_range(0.5, 0.0, 1.0, 0.2, 0.4) - 0.3).abs() < TOLERANCE);
        assert!((map_range(3.0, 2.0, 4.0, 0.0, 1.0) - 0.5).abs() < TOLERANCE);
        // Reversed target ranges are allowed.
        assert!((map_range(0.25, 0.0, 1.0, 1.0, 0.0) - 0.75).abs() < TOLERANCE);
    }

    #[test]
    fn between_accepts_near_bounds() {
        assert!(between(0.5, 0.0, 1.0));
        assert!(between(1.0 + 1e-7, 0.0, 1.0));
        assert!(!between(1.1, 0.0, 1.0));
    }

    #[test]
    fn lerp_hits_start_exactly() {
        let a = Point3::new(0.1, 0.2, 0.3);
        let b = Point3::new(7.0, -3.0, 1.0);
        assert_eq!(lerp(0.0, &a, &b), a);
    }
}
