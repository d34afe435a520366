mod curve_offset;
mod scale;

pub use curve_offset::CurveOffset;
pub use scale::{CurveScale, OffsetDistance};
