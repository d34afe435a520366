//! Baseline alignment and signed angles in the XY plane.
//!
//! Alignment rotates and translates a point set so that a baseline from
//! `start` to `end` lies on the positive x-axis. Root queries then reduce to
//! finding zero crossings of the aligned y-coordinates.

use super::Point3;

/// Aligns `points` to the baseline from `start` to `end`.
///
/// The z-coordinate is carried through unchanged; the rotation is about the
/// z-axis.
#[must_use]
pub fn align_to_baseline(points: &[Point3], start: &Point3, end: &Point3) -> Vec<Point3> {
    let angle = -(end.y - start.y).atan2(end.x - start.x);
    let (sin, cos) = angle.sin_cos();
    points
        .iter()
        .map(|p| {
            let dx = p.x - start.x;
            let dy = p.y - start.y;
            Point3::new(dx * cos - dy * sin, dx * sin + dy * cos, p.z)
        })
        .collect()
}

/// Signed angle at `origin` from `v1` to `v2`, in `(-π, π]`.
///
/// Positive when turning from `v1` towards `v2` is counter-clockwise in a
/// y-up frame.
#[must_use]
pub fn signed_angle(origin: &Point3, v1: &Point3, v2: &Point3) -> f64 {
    let dx1 = v1.x - origin.x;
    let dy1 = v1.y - origin.y;
    let dx2 = v2.x - origin.x;
    let dy2 = v2.y - origin.y;
    let cross = dx1 * dy2 - dy1 * dx2;
    let dot = dx1 * dx2 + dy1 * dy2;
    cross.atan2(dot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn diagonal_baseline_maps_to_x_axis() {
        let start = Point3::new(1.0, 1.0, 0.0);
        let end = Point3::new(4.0, 5.0, 0.0);
        let aligned = align_to_baseline(&[start, end], &start, &end);
        assert_abs_diff_eq!(aligned[0], Point3::origin(), epsilon = 1e-12);
        assert_abs_diff_eq!(aligned[1], Point3::new(5.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn points_above_baseline_stay_positive() {
        let start = Point3::new(0.0, 0.0, 0.0);
        let end = Point3::new(0.0, 10.0, 0.0);
        // Left of an upward baseline is above the aligned x-axis.
        let aligned = align_to_baseline(&[Point3::new(-2.0, 5.0, 3.0)], &start, &end);
        assert_abs_diff_eq!(aligned[0].x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(aligned[0].y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(aligned[0].z, 3.0);
    }

    #[test]
    fn signed_angle_orientation() {
        let o = Point3::origin();
        let x = Point3::new(1.0, 0.0, 0.0);
        let y = Point3::new(0.0, 1.0, 0.0);
        assert_abs_diff_eq!(signed_angle(&o, &x, &y), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_angle(&o, &y, &x), -FRAC_PI_2, epsilon = 1e-12);
    }
}
