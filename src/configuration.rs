use std::fs::File;
use std::io::BufReader;
use std::path::{
    Path,
    PathBuf
};

use serde::{
    Deserialize,
    Serialize
};
use thiserror::Error;

use crate::batch::batchevaluator::BatchEvaluator;
use crate::batch::batchrequest::{
    BatchRequest,
    YearBounds
};
use crate::estimation::criticalvalue::BackendKind;
use crate::estimation::intervalestimator::IntervalEstimator;
use crate::regression::curvefitter::CurveFitter;
use crate::regression::fiterror::FitError;
use crate::series::seriessource::{
    SeriesKey,
    SyntheticSeriesSource
};

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] FitError)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfiguration {
    pub country: String,
    pub indicator: String,
    pub start_year: i32,
    pub end_year: i32
}

impl Default for SeriesConfiguration {
    fn default() -> Self {
        SeriesConfiguration {
            country: "USA".to_owned(),
            indicator: "NY.GDP.PCAP.CD".to_owned(),
            start_year: 1960,
            end_year: 2023
        }
    }
}

/// Query parameters for one fitting session, loaded from JSON.
///
/// Every field has a default, so `{}` is a valid configuration:
///
/// ```json
/// {
///   "degree": 3,
///   "confidence": 0.95,
///   "backend": "full",
///   "year_bounds": { "min": 1950, "max": 2100 },
///   "series": { "country": "USA", "indicator": "NY.GDP.PCAP.CD" },
///   "data_directory": "data/",
///   "query_year": 2030,
///   "batch": { "range": { "start": 2024, "end": 2035, "step": 1 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    degree: usize,
    confidence: f64,
    backend: BackendKind,
    year_bounds: YearBounds,
    strict_batch: bool,
    series: SeriesConfiguration,
    data_directory: Option<PathBuf>,
    query_year: Option<i32>,
    batch: Option<BatchRequest>
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            degree: 3,
            confidence: 0.95,
            backend: BackendKind::Full,
            year_bounds: YearBounds::default(),
            strict_batch: false,
            series: SeriesConfiguration::default(),
            data_directory: None,
            query_year: None,
            batch: None
        }
    }
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration::default()
    }

    pub fn from_reader(file_path: impl AsRef<Path>) -> Result<Configuration, ConfigurationError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let config: Configuration = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Configuration, ConfigurationError> {
        let config: Configuration = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FitError> {
        if self.degree == 0 {
            return Err(FitError::InvalidDegree(self.degree));
        }
        FitError::check_confidence(self.confidence)?;
        if self.year_bounds.min > self.year_bounds.max {
            return Err(FitError::InvalidRange {
                start: self.year_bounds.min,
                end: self.year_bounds.max,
                step: 1
            });
        }
        if self.strict_batch {
            if let Some(batch) = &self.batch {
                batch.validate_strict()?;
            }
        }
        Ok(())
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn year_bounds(&self) -> YearBounds {
        self.year_bounds
    }

    pub fn series(&self) -> &SeriesConfiguration {
        &self.series
    }

    pub fn data_directory(&self) -> Option<&Path> {
        self.data_directory.as_deref()
    }

    pub fn query_year(&self) -> Option<i32> {
        self.query_year
    }

    pub fn batch(&self) -> Option<&BatchRequest> {
        self.batch.as_ref()
    }

    pub fn series_key(&self) -> SeriesKey {
        SeriesKey::new(self.series.country.clone(), self.series.indicator.clone())
    }

    pub fn curve_fitter(&self) -> Result<CurveFitter, FitError> {
        CurveFitter::new(self.degree)
    }

    pub fn interval_estimator(&self) -> IntervalEstimator {
        IntervalEstimator::new(self.backend.build())
    }

    pub fn batch_evaluator(&self) -> BatchEvaluator {
        BatchEvaluator::new(self.interval_estimator())
            .with_bounds(self.year_bounds)
            .strict(self.strict_batch)
    }

    pub fn synthetic_source(&self) -> SyntheticSeriesSource {
        SyntheticSeriesSource::new(self.series.start_year, self.series.end_year)
    }
}
