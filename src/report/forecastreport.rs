use std::io::Write;

use chrono::{
    DateTime,
    Utc
};
use serde::{
    Deserialize,
    Serialize
};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::estimation::diagnostics::ModelDiagnostics;
use crate::estimation::queryresult::QueryResult;
use crate::objectwithuuid::ObjectWithUUID;
use crate::regression::polynomialmodel::PolynomialModel;
use crate::series::seriessource::SeriesKey;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),

    #[error(transparent)]
    CsvWriteError(#[from] csv::Error),

    #[error(transparent)]
    IOError(#[from] std::io::Error)
}

/// Everything the presentation layer needs to render or export one fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    id: Uuid,
    generated_at: DateTime<Utc>,
    key: SeriesKey,
    model: PolynomialModel,
    equation: String,
    diagnostics: ModelDiagnostics,
    results: Vec<QueryResult>
}

#[derive(Serialize)]
struct ResultCsvRow<'a> {
    year: f64,
    predicted: f64,
    lower: f64,
    upper: f64,
    calculation_type: &'a str,
    uncertainty_factor: f64,
    r_squared: f64,
    mae: f64,
    rmse: f64,
    data_range: &'a str,
    confidence_level: f64
}

impl ForecastReport {
    pub fn build(
        key: SeriesKey,
        model: PolynomialModel,
        diagnostics: ModelDiagnostics,
        results: Vec<QueryResult>,
    ) -> ForecastReport {
        let equation = model.equation();
        ForecastReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            key,
            model,
            equation,
            diagnostics,
            results
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn key(&self) -> &SeriesKey {
        &self.key
    }

    pub fn model(&self) -> &PolynomialModel {
        &self.model
    }

    pub fn equation(&self) -> &str {
        &self.equation
    }

    pub fn diagnostics(&self) -> &ModelDiagnostics {
        &self.diagnostics
    }

    pub fn results(&self) -> &[QueryResult] {
        &self.results
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One row per query result, header first.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for result in &self.results {
            csv_writer.serialize(ResultCsvRow {
                year: result.query_year,
                predicted: result.predicted_value,
                lower: result.lower_bound,
                upper: result.upper_bound,
                calculation_type: result.calculation_type.as_str(),
                uncertainty_factor: result.uncertainty_factor,
                r_squared: result.r_squared(),
                mae: result.mae(),
                rmse: result.rmse(),
                data_range: &result.data_range,
                confidence_level: result.confidence_level
            })?;
        }
        csv_writer.flush()?;
        info!(report = %self.id, rows = self.results.len(), "wrote csv report");
        Ok(())
    }
}

impl ObjectWithUUID for ForecastReport {
    fn uuid(&self) -> &Uuid {
        &self.id
    }
}
