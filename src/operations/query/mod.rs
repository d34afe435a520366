mod intersect;
mod line_intersect;
mod self_intersect;

pub use intersect::{
    CurveIntersect, IntersectOptions, IntersectionPair, DEFAULT_PAIR_BUDGET, DEFAULT_THRESHOLD,
};
pub use line_intersect::LineIntersect;
pub use self_intersect::SelfIntersect;
