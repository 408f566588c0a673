use thiserror::Error;

/// Failures raised while building a series, fitting a model or estimating
/// intervals.
///
/// Every variant is a deterministic input problem: the same inputs always
/// fail the same way, so retrying without changing them is pointless.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("not enough data points for a degree-{degree} fit: {required} required, {actual} given")]
    InsufficientData {
        degree: usize,
        required: usize,
        actual: usize,
    },

    #[error("series is empty")]
    EmptySeries,

    #[error("invalid year range: start {start}, end {end}, step {step}")]
    InvalidRange {
        start: i32,
        end: i32,
        step: i32,
    },

    #[error("numerical fit failed: {0}")]
    NumericalFit(String),

    #[error("polynomial degree must be at least 1, got {0}")]
    InvalidDegree(usize),

    #[error("confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    #[error("year {0} appears more than once in the series")]
    DuplicateYear(i32),

    #[error("value for year {0} is not a finite number")]
    NonFiniteValue(i32),
}

impl FitError {
    pub fn insufficient_data(degree: usize, actual: usize) -> FitError {
        FitError::InsufficientData {
            degree,
            required: degree + 1,
            actual,
        }
    }

    pub fn check_confidence(confidence: f64) -> Result<f64, FitError> {
        if confidence > 0.0 && confidence < 1.0 {
            Ok(confidence)
        } else {
            Err(FitError::InvalidConfidence(confidence))
        }
    }
}
