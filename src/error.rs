use thiserror::Error;

/// Top-level error type for the Bezel curve kernel.
///
/// Every variant is local and deterministic: retrying the same call with the
/// same inputs always fails the same way.
#[derive(Debug, Error)]
pub enum BezelError {
    /// The requested geometric construction is impossible for this curve.
    ///
    /// Usually fixed by reducing the curve into simple segments first.
    #[error("invalid curve: {0}")]
    InvalidCurve(String),

    /// An option or tuning value is malformed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// An iterative computation did not converge within its budget.
    #[error("computation failed: {0}")]
    ComputationFailed(String),

    /// Point, coordinate or weight data is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl BezelError {
    /// Builds the out-of-range error for a curve parameter `t` outside `[0, 1]`.
    #[must_use]
    pub fn t_out_of_range(value: f64) -> Self {
        Self::ParameterOutOfRange {
            parameter: "t",
            value,
            min: 0.0,
            max: 1.0,
        }
    }
}

/// Convenience type alias for results using [`BezelError`].
pub type Result<T> = std::result::Result<T, BezelError>;
