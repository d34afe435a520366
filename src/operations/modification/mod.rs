mod reduce;

pub use reduce::{CurveBuilder, Reduce, StandardBuilder, DEFAULT_REDUCE_STEP};
