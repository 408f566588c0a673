use serde::{
    Deserialize,
    Serialize
};

use crate::regression::fiterror::FitError;
use crate::series::observation::Observation;

/// An immutable, validated historical series.
///
/// # Invariants
/// - observations are sorted ascending by year
/// - no year appears twice
/// - every value is finite
///
/// An empty series is representable; the estimator reports it as
/// `FitError::EmptySeries` rather than the constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    observations: Vec<Observation>
}

impl Series {
    pub fn new(mut observations: Vec<Observation>) -> Result<Series, FitError> {
        if let Some(bad) = observations.iter().find(|obs| !obs.value().is_finite()) {
            return Err(FitError::NonFiniteValue(bad.year()));
        }

        observations.sort_by_key(|obs| obs.year());

        if let Some(pair) = observations.windows(2).find(|pair| pair[0].year() == pair[1].year()) {
            return Err(FitError::DuplicateYear(pair[0].year()));
        }

        Ok(Series { observations })
    }

    pub fn from_pairs(pairs: &[(i32, f64)]) -> Result<Series, FitError> {
        Series::new(pairs.iter().copied().map(Observation::from).collect())
    }

    pub fn empty() -> Series {
        Series { observations: Vec::new() }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn years(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.year() as f64).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.value()).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn min_year(&self) -> Option<i32> {
        self.observations.first().map(|obs| obs.year())
    }

    pub fn max_year(&self) -> Option<i32> {
        self.observations.last().map(|obs| obs.year())
    }

    /// Whether `year` lies inside the observed range, both ends inclusive.
    pub fn contains_year(&self, year: f64) -> bool {
        match (self.min_year(), self.max_year()) {
            (Some(min), Some(max)) => year >= min as f64 && year <= max as f64,
            _ => false
        }
    }

    /// Years between `year` and the nearest edge of the observed range;
    /// zero inside the range.
    pub fn distance_outside(&self, year: f64) -> f64 {
        match (self.min_year(), self.max_year()) {
            (Some(min), _) if year < min as f64 => min as f64 - year,
            (_, Some(max)) if year > max as f64 => year - max as f64,
            _ => 0.0
        }
    }

    /// `"{min}-{max}"`, or an empty string for an empty series.
    pub fn data_range(&self) -> String {
        match (self.min_year(), self.max_year()) {
            (Some(min), Some(max)) => format!("{}-{}", min, max),
            _ => String::new()
        }
    }
}

impl<'de> Deserialize<'de> for Series {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de> {
        #[derive(Deserialize)]
        struct SeriesJsonProp {
            observations: Vec<Observation>
        }

        let prop = SeriesJsonProp::deserialize(deserializer)?;
        Series::new(prop.observations).map_err(serde::de::Error::custom)
    }
}
