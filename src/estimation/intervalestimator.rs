use std::sync::Arc;

use tracing::debug;

use crate::estimation::criticalvalue::{
    CriticalValueBackend,
    FullNumericBackend
};
use crate::estimation::diagnostics::ModelDiagnostics;
use crate::estimation::queryresult::{
    CalculationType,
    QueryResult
};
use crate::math::curve::curve::Curve;
use crate::regression::fiterror::FitError;
use crate::regression::polynomialmodel::PolynomialModel;
use crate::series::series::Series;

/// Years of distance from the observed range that add 1.0 to the
/// uncertainty factor.
const INFLATION_YEARS: f64 = 10.0;

/// Prediction intervals for single query years.
///
/// # Approximation
/// The standard error of a new observation is taken as
/// `sqrt(MSE · (1 + 1/n))`, which ignores the per-coefficient covariance
/// term `xᵀ(XᵀX)⁻¹x`. It therefore does not grow with distance from the
/// data; the separate `uncertainty_factor` reports that growth instead.
#[derive(Clone)]
pub struct IntervalEstimator {
    backend: Arc<dyn CriticalValueBackend>
}

impl IntervalEstimator {
    pub fn new(backend: Arc<dyn CriticalValueBackend>) -> IntervalEstimator {
        IntervalEstimator { backend }
    }

    pub fn backend(&self) -> &Arc<dyn CriticalValueBackend> {
        &self.backend
    }

    pub fn estimate(
        &self,
        model: &PolynomialModel,
        series: &Series,
        query_year: f64,
        confidence: f64,
    ) -> Result<QueryResult, FitError> {
        if series.is_empty() {
            return Err(FitError::EmptySeries);
        }
        let confidence = FitError::check_confidence(confidence)?;

        let diagnostics = ModelDiagnostics::evaluate(model, series)?;
        self.estimate_with_diagnostics(model, series, &diagnostics, query_year, confidence)
    }

    /// Same as [`IntervalEstimator::estimate`] but reuses diagnostics that
    /// were already computed for `model` over `series`.
    pub(crate) fn estimate_with_diagnostics(
        &self,
        model: &PolynomialModel,
        series: &Series,
        diagnostics: &ModelDiagnostics,
        query_year: f64,
        confidence: f64,
    ) -> Result<QueryResult, FitError> {
        let n = series.len() as f64;
        let degrees_of_freedom = n - model.degree() as f64 - 1.0;
        let critical_value = self.backend.critical_value(confidence, degrees_of_freedom)?;

        let predicted_value = model.value(query_year);
        let standard_error = (diagnostics.mse * (1.0 + 1.0 / n)).sqrt();
        let margin_of_error = critical_value * standard_error;

        let calculation_type = if series.contains_year(query_year) {
            CalculationType::Interpolation
        } else {
            CalculationType::Extrapolation
        };
        let uncertainty_factor = 1.0 + series.distance_outside(query_year) / INFLATION_YEARS;

        debug!(
            query_year,
            predicted_value,
            margin_of_error,
            kind = %calculation_type,
            backend = self.backend.name(),
            "estimated prediction interval"
        );

        Ok(QueryResult {
            query_year,
            predicted_value,
            lower_bound: predicted_value - margin_of_error,
            upper_bound: predicted_value + margin_of_error,
            margin_of_error,
            standard_error,
            critical_value,
            degrees_of_freedom,
            calculation_type,
            uncertainty_factor,
            diagnostics: *diagnostics,
            data_range: series.data_range(),
            confidence_level: confidence
        })
    }
}

impl Default for IntervalEstimator {
    fn default() -> Self {
        IntervalEstimator::new(Arc::new(FullNumericBackend))
    }
}

/// Estimate with the Student-t backend.
pub fn estimate(
    model: &PolynomialModel,
    series: &Series,
    query_year: f64,
    confidence: f64,
) -> Result<QueryResult, FitError> {
    IntervalEstimator::default().estimate(model, series, query_year, confidence)
}
