use tracing::info;

use crate::batch::batchrequest::{
    BatchRequest,
    YearBounds
};
use crate::estimation::diagnostics::ModelDiagnostics;
use crate::estimation::intervalestimator::IntervalEstimator;
use crate::estimation::queryresult::QueryResult;
use crate::regression::fiterror::FitError;
use crate::regression::polynomialmodel::PolynomialModel;
use crate::series::series::Series;

/// Applies an [`IntervalEstimator`] to every year of a [`BatchRequest`].
///
/// Results come back in request order, one per accepted year. Evaluation is
/// deterministic, so re-running a batch reproduces it exactly.
#[derive(Clone)]
pub struct BatchEvaluator {
    estimator: IntervalEstimator,
    bounds: YearBounds,
    strict: bool
}

impl BatchEvaluator {
    pub fn new(estimator: IntervalEstimator) -> BatchEvaluator {
        BatchEvaluator {
            estimator,
            bounds: YearBounds::default(),
            strict: false
        }
    }

    pub fn with_bounds(mut self, bounds: YearBounds) -> BatchEvaluator {
        self.bounds = bounds;
        self
    }

    /// Reject inverted or zero-step ranges with `FitError::InvalidRange`
    /// instead of returning an empty batch.
    pub fn strict(mut self, strict: bool) -> BatchEvaluator {
        self.strict = strict;
        self
    }

    pub fn bounds(&self) -> &YearBounds {
        &self.bounds
    }

    /// Lazily evaluate the batch; each call starts from the first year.
    pub fn iter<'a>(
        &'a self,
        model: &'a PolynomialModel,
        series: &'a Series,
        request: &BatchRequest,
        confidence: f64,
    ) -> Result<BatchIter<'a>, FitError> {
        if self.strict {
            request.validate_strict()?;
        }
        if series.is_empty() {
            return Err(FitError::EmptySeries);
        }
        let confidence = FitError::check_confidence(confidence)?;
        let diagnostics = ModelDiagnostics::evaluate(model, series)?;

        Ok(BatchIter {
            estimator: &self.estimator,
            model,
            series,
            diagnostics,
            years: request.years(&self.bounds),
            position: 0,
            confidence
        })
    }

    pub fn evaluate_batch(
        &self,
        model: &PolynomialModel,
        series: &Series,
        request: &BatchRequest,
        confidence: f64,
    ) -> Result<Vec<QueryResult>, FitError> {
        let results = self
            .iter(model, series, request, confidence)?
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            years = results.len(),
            extrapolated = results.iter().filter(|r| r.is_extrapolation()).count(),
            "evaluated batch"
        );
        Ok(results)
    }
}

impl Default for BatchEvaluator {
    fn default() -> Self {
        BatchEvaluator::new(IntervalEstimator::default())
    }
}

pub struct BatchIter<'a> {
    estimator: &'a IntervalEstimator,
    model: &'a PolynomialModel,
    series: &'a Series,
    diagnostics: ModelDiagnostics,
    years: Vec<i32>,
    position: usize,
    confidence: f64
}

impl BatchIter<'_> {
    pub fn years(&self) -> &[i32] {
        &self.years
    }
}

impl Iterator for BatchIter<'_> {
    type Item = Result<QueryResult, FitError>;

    fn next(&mut self) -> Option<Self::Item> {
        let year = *self.years.get(self.position)?;
        self.position += 1;
        Some(self.estimator.estimate_with_diagnostics(
            self.model,
            self.series,
            &self.diagnostics,
            year as f64,
            self.confidence
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.years.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BatchIter<'_> {}

/// Evaluate `request` with the default Student-t estimator and year bounds.
pub fn evaluate_batch(
    model: &PolynomialModel,
    series: &Series,
    request: &BatchRequest,
    confidence: f64,
) -> Result<Vec<QueryResult>, FitError> {
    BatchEvaluator::default().evaluate_batch(model, series, request, confidence)
}
