pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support;

pub use error::{BezelError, Result};
pub use geometry::{BezierCurve, Dimension, Point};
