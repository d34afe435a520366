use crate::geometry::{BezierCurve, Point};

/// Installs a fmt subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Builds a planar curve from `(x, y)` pairs.
#[allow(clippy::unwrap_used)]
pub fn planar(coords: &[(f64, f64)]) -> BezierCurve {
    BezierCurve::new(coords.iter().map(|&(x, y)| Point::planar(x, y)).collect()).unwrap()
}

/// Builds a spatial curve from `(x, y, z)` triples.
#[allow(clippy::unwrap_used)]
pub fn spatial(coords: &[(f64, f64, f64)]) -> BezierCurve {
    BezierCurve::new(
        coords
            .iter()
            .map(|&(x, y, z)| Point::spatial(x, y, z))
            .collect(),
    )
    .unwrap()
}
