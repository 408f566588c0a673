use std::fmt;

use serde::{
    Deserialize,
    Serialize
};

use crate::math::curve::curve::Curve;
use crate::regression::fiterror::FitError;
use crate::regression::polynomialmodel::PolynomialModel;
use crate::series::series::Series;

/// Goodness-of-fit metrics of a model over its training series.
///
/// All metrics are computed on the fitted observations, never on query
/// points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelDiagnostics {
    pub observations: usize,
    /// Sum of squared residuals.
    pub sse: f64,
    /// Mean squared residual, `sse / n`.
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64
}

impl ModelDiagnostics {
    pub fn evaluate(model: &PolynomialModel, series: &Series) -> Result<ModelDiagnostics, FitError> {
        if series.is_empty() {
            return Err(FitError::EmptySeries);
        }

        let values = series.values();
        let fitted = model.values(&series.years());
        let residuals: Vec<f64> = values
            .iter()
            .zip(fitted.iter())
            .map(|(observed, predicted)| observed - predicted)
            .collect();

        let n = values.len() as f64;
        let sse: f64 = residuals.iter().map(|r| r * r).sum();
        let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / n;
        let mse = sse / n;

        let mean = values.iter().sum::<f64>() / n;
        let sst: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        // constant target: perfect fit explains everything, anything else nothing
        let r_squared = if sst > 0.0 {
            1.0 - sse / sst
        } else if sse == 0.0 {
            1.0
        } else {
            0.0
        };

        Ok(ModelDiagnostics {
            observations: values.len(),
            sse,
            mse,
            rmse: mse.sqrt(),
            mae,
            r_squared
        })
    }
}

impl fmt::Display for ModelDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n = {}, R² = {:.4}, MAE = {:.4}, RMSE = {:.4}",
            self.observations, self.r_squared, self.mae, self.rmse
        )
    }
}
