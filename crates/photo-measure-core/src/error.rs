/// Errors returned by the measurement engine.
///
/// Every variant is terminal for the operation that produced it; the engine
/// never substitutes a default value for invalid input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("polygon needs at least 3 vertices, got {vertices}")]
    InvalidGeometry { vertices: usize },

    #[error("polygon vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },

    #[error("degenerate calibration: {reason}")]
    DegenerateCalibration { reason: &'static str },

    #[error("region mask selects no pixels")]
    EmptyRegion,

    #[error("depth is constant ({level}) over the masked region")]
    FlatRegion { level: f32 },

    #[error("{operation} requires {missing}")]
    PrerequisiteMissing {
        operation: &'static str,
        missing: &'static str,
    },

    #[error("shape mismatch (expected {expected:?}, got {got:?})")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("invalid buffer length (expected {expected} values, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("{name} must be a finite positive number, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Reject non-finite and non-positive scalar parameters.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, MeasureError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MeasureError::InvalidParameter { name, value })
    }
}
