use std::fmt;

use serde::{
    Deserialize,
    Serialize
};

use crate::estimation::diagnostics::ModelDiagnostics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationType {
    Interpolation,
    Extrapolation
}

impl CalculationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationType::Interpolation => "Interpolation",
            CalculationType::Extrapolation => "Extrapolation"
        }
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Prediction interval for one query year.
///
/// `lower_bound`/`upper_bound` are the un-inflated interval. The distance
/// based `uncertainty_factor` is reported alongside and only applied by
/// [`QueryResult::widened_bounds`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query_year: f64,
    pub predicted_value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub margin_of_error: f64,
    pub standard_error: f64,
    pub critical_value: f64,
    pub degrees_of_freedom: f64,
    pub calculation_type: CalculationType,
    pub uncertainty_factor: f64,
    pub diagnostics: ModelDiagnostics,
    pub data_range: String,
    pub confidence_level: f64
}

impl QueryResult {
    pub fn is_extrapolation(&self) -> bool {
        self.calculation_type == CalculationType::Extrapolation
    }

    pub fn r_squared(&self) -> f64 {
        self.diagnostics.r_squared
    }

    pub fn mae(&self) -> f64 {
        self.diagnostics.mae
    }

    pub fn rmse(&self) -> f64 {
        self.diagnostics.rmse
    }

    /// Bounds with the margin multiplied by the uncertainty factor.
    pub fn widened_bounds(&self) -> (f64, f64) {
        let margin = self.margin_of_error * self.uncertainty_factor;
        (self.predicted_value - margin, self.predicted_value + margin)
    }
}
