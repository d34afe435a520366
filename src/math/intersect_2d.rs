use super::{Point3, TOLERANCE};

/// Intersection of the infinite line through `a0`, `a1` with the infinite
/// line through `b0`, `b1`.
///
/// Lines lying in the XY plane meet at their exact 2D intersection. For
/// spatial input the midpoint of the shortest segment between the two lines
/// is returned, which coincides with the intersection whenever the lines
/// actually meet.
///
/// Returns `None` if either line is degenerate or the lines are parallel.
#[must_use]
pub fn line_line_intersect(a0: &Point3, a1: &Point3, b0: &Point3, b1: &Point3) -> Option<Point3> {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;

    let a = d1.dot(&d1);
    let b = d1.dot(&d2);
    let c = d2.dot(&d2);
    if a < TOLERANCE * TOLERANCE || c < TOLERANCE * TOLERANCE {
        return None;
    }

    let denom = a * c - b * b;
    if denom.abs() <= TOLERANCE * a * c {
        return None;
    }

    let d = d1.dot(&r);
    let e = d2.dot(&r);
    let s = (b * e - c * d) / denom;
    let u = (a * e - b * d) / denom;

    let on_a = a0 + d1 * s;
    let on_b = b0 + d2 * u;
    Some(nalgebra::center(&on_a, &on_b))
}
