use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize
};
use statrs::distribution::{
    ContinuousCDF,
    Normal,
    StudentsT
};
use tracing::warn;

use crate::regression::fiterror::FitError;

/// z value used by the approximate backend regardless of the requested level.
pub const APPROXIMATE_Z: f64 = 1.96;

/// Two-sided critical value provider.
///
/// `Send + Sync` so a single backend can be shared behind an `Arc` by every
/// estimator in the process.
pub trait CriticalValueBackend: Send + Sync {
    /// Critical value `q` such that a centred interval `±q·se` covers
    /// `confidence` of the reference distribution.
    fn critical_value(&self, confidence: f64, degrees_of_freedom: f64) -> Result<f64, FitError>;

    fn name(&self) -> &'static str;
}

// ─────────────────────────────────────────────────────────────────────────────
// FullNumericBackend
// ─────────────────────────────────────────────────────────────────────────────

/// Student-t quantiles with `n - p - 1` degrees of freedom.
///
/// With fewer than one degree of freedom the t distribution is undefined;
/// the normal quantile is used instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullNumericBackend;

impl CriticalValueBackend for FullNumericBackend {
    fn critical_value(&self, confidence: f64, degrees_of_freedom: f64) -> Result<f64, FitError> {
        let confidence = FitError::check_confidence(confidence)?;
        let upper_tail = 1.0 - (1.0 - confidence) / 2.0;

        if degrees_of_freedom >= 1.0 {
            let t = StudentsT::new(0.0, 1.0, degrees_of_freedom)
                .map_err(|error| FitError::NumericalFit(error.to_string()))?;
            Ok(t.inverse_cdf(upper_tail))
        } else {
            warn!(
                degrees_of_freedom,
                "no residual degrees of freedom, using normal quantile"
            );
            let normal = Normal::new(0.0, 1.0)
                .map_err(|error| FitError::NumericalFit(error.to_string()))?;
            Ok(normal.inverse_cdf(upper_tail))
        }
    }

    fn name(&self) -> &'static str {
        "student-t"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ApproximateBackend
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed large-sample 95% z value.
///
/// # Known limitation
/// 1.96 is only appropriate for 95% intervals with many residual degrees of
/// freedom. Other levels still get 1.96; a warning is logged rather than
/// pretending to support them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateBackend;

impl CriticalValueBackend for ApproximateBackend {
    fn critical_value(&self, confidence: f64, _degrees_of_freedom: f64) -> Result<f64, FitError> {
        let confidence = FitError::check_confidence(confidence)?;
        if (confidence - 0.95).abs() > 1e-9 {
            warn!(
                confidence,
                z = APPROXIMATE_Z,
                "approximate backend only supports 95% intervals"
            );
        }
        Ok(APPROXIMATE_Z)
    }

    fn name(&self) -> &'static str {
        "approximate-z"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BackendKind
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Full,
    Approximate
}

impl BackendKind {
    pub fn build(&self) -> Arc<dyn CriticalValueBackend> {
        match self {
            BackendKind::Full => Arc::new(FullNumericBackend),
            BackendKind::Approximate => Arc::new(ApproximateBackend)
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn student_t_matches_tables() {
        let backend = FullNumericBackend;
        assert_abs_diff_eq!(backend.critical_value(0.95, 1.0).unwrap(), 12.706, epsilon = 1e-3);
        assert_abs_diff_eq!(backend.critical_value(0.95, 10.0).unwrap(), 2.228, epsilon = 1e-3);
        assert_abs_diff_eq!(backend.critical_value(0.99, 20.0).unwrap(), 2.845, epsilon = 1e-3);
    }

    #[test]
    fn no_degrees_of_freedom_falls_back_to_normal() {
        let backend = FullNumericBackend;
        assert_abs_diff_eq!(backend.critical_value(0.95, 0.0).unwrap(), 1.95996, epsilon = 1e-4);
    }

    #[test]
    fn approximate_is_fixed() {
        let backend = ApproximateBackend;
        assert_eq!(backend.critical_value(0.95, 3.0).unwrap(), APPROXIMATE_Z);
        assert_eq!(backend.critical_value(0.80, 3.0).unwrap(), APPROXIMATE_Z);
    }

    #[test]
    fn confidence_is_validated() {
        for backend in [BackendKind::Full.build(), BackendKind::Approximate.build()] {
            assert_eq!(backend.critical_value(1.0, 5.0), Err(FitError::InvalidConfidence(1.0)));
            assert_eq!(backend.critical_value(0.0, 5.0), Err(FitError::InvalidConfidence(0.0)));
        }
    }
}
