pub mod curve;
pub mod point;

pub use curve::{
    Arc, ArcSegment, AxisBounds, BezierCurve, BoundingBox, Curvature, Curve, CurveDomain,
    CurvePoint, Extrema, OffsetPoint, ParameterInterval, Projection, Split,
};
pub use point::{Dimension, Point};
