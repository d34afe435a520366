//! Circle-through-three-points math in the XY plane.
//!
//! Angles follow the `atan2` convention. A fitted arc always runs
//! counter-clockwise from `start_angle` to `end_angle` with
//! `start_angle < end_angle`, and the span between them contains the middle
//! sample point.
use std::f64::consts::TAU;

use super::intersect_2d::line_line_intersect;
use super::{Point3, Vector3};

/// Circle through three points, with the angular span covering them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleFit {
    /// Circle center (z = 0).
    pub center: Point3,
    /// Circle radius.
    pub radius: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians, always greater than `start_angle`.
    pub end_angle: f64,
}

/// Finds the circle through `p1`, `p2`, `p3` using their x and y coordinates.
///
/// The center is where the perpendicular bisectors of the chords `p1 p2` and
/// `p2 p3` meet. The start and end angles are chosen so that the arc from
/// `p1` to `p3` passes over `p2`.
///
/// Returns `None` when the points are collinear (the bisectors are parallel).
#[must_use]
pub fn circle_through_points(p1: &Point3, p2: &Point3, p3: &Point3) -> Option<CircleFit> {
    let flat = |p: &Point3| Point3::new(p.x, p.y, 0.0);
    let (p1, p2, p3) = (flat(p1), flat(p2), flat(p3));

    let m1 = nalgebra::center(&p1, &p2);
    let m2 = nalgebra::center(&p2, &p3);
    let n1 = quarter_turn(&(p2 - p1));
    let n2 = quarter_turn(&(p3 - p2));

    let center = line_line_intersect(&m1, &(m1 + n1), &m2, &(m2 + n2))?;
    let radius = nalgebra::distance(&center, &p1);

    let angle_of = |p: &Point3| (p.y - center.y).atan2(p.x - center.x);
    let mut s = angle_of(&p1);
    let m = angle_of(&p2);
    let mut e = angle_of(&p3);

    if s < e {
        // s < m < e keeps (s, e); otherwise the arc wraps past s.
        if s > m || m > e {
            s += TAU;
        }
        if s > e {
            std::mem::swap(&mut s, &mut e);
        }
    } else if e < m && m < s {
        std::mem::swap(&mut s, &mut e);
    } else {
        e += TAU;
    }

    Some(CircleFit {
        center,
        radius,
        start_angle: s,
        end_angle: e,
    })
}

/// Point on a circle in the XY plane at `angle`.
#[must_use]
pub fn point_on_circle(center: &Point3, radius: f64, angle: f64) -> Point3 {
    let (sin, cos) = angle.sin_cos();
    Point3::new(center.x + radius * cos, center.y + radius * sin, center.z)
}

fn quarter_turn(v: &Vector3) -> Vector3 {
    Vector3::new(-v.y, v.x, 0.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn unit_circle_upper_half_ccw() {
        let fit = circle_through_points(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(-1.0, 0.0, 0.0),
        )
        .unwrap();
        assert_abs_diff_eq!(fit.center, Point3::origin(), epsilon = 1e-12);
        assert_abs_diff_eq!(fit.radius, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.start_angle, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.end_angle, PI, epsilon = 1e-12);
    }

    #[test]
    fn clockwise_samples_give_same_span() {
        let fit = circle_through_points(
            &Point3::new(-1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        )
        .unwrap();
        assert_abs_diff_eq!(fit.start_angle, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.end_angle, PI, epsilon = 1e-12);
    }

    #[test]
    fn span_wraps_across_branch_cut() {
        // Left half of the unit circle: (0,1) -> (-1,0) -> (0,-1).
        let fit = circle_through_points(
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(-1.0, 0.0, 0.0),
            &Point3::new(0.0, -1.0, 0.0),
        )
        .unwrap();
        assert!(fit.start_angle < fit.end_angle);
        assert_abs_diff_eq!(fit.end_angle - fit.start_angle, PI, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.start_angle, FRAC_PI_2, epsilon = 1e-12);
        let mid = point_on_circle(&fit.center, fit.radius, 0.5 * (fit.start_angle + fit.end_angle));
        assert_abs_diff_eq!(mid, Point3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn collinear_points_have_no_circle() {
        let fit = circle_through_points(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 1.0, 0.0),
            &Point3::new(2.0, 2.0, 0.0),
        );
        assert!(fit.is_none());
    }

    #[test]
    fn offset_circle() {
        let c = Point3::new(3.0, -2.0, 0.0);
        let r = 2.5;
        let fit = circle_through_points(
            &point_on_circle(&c, r, 0.3),
            &point_on_circle(&c, r, 1.1),
            &point_on_circle(&c, r, 2.0),
        )
        .unwrap();
        assert_abs_diff_eq!(fit.center, c, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.radius, r, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.start_angle, 0.3, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.end_angle, 2.0, epsilon = 1e-9);
    }
}
