mod arcs;

pub use arcs::{ArcApproximation, ArcOptions};
