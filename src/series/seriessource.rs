use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt;

use serde::{
    Deserialize,
    Serialize
};
use thiserror::Error;
use tracing::{
    debug,
    warn
};

use crate::regression::fiterror::FitError;
use crate::series::observation::Observation;
use crate::series::series::Series;

/// Identifies one indicator series, e.g. `USA` / `NY.GDP.MKTP.CD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    country: String,
    indicator: String
}

impl SeriesKey {
    pub fn new(country: impl Into<String>, indicator: impl Into<String>) -> SeriesKey {
        SeriesKey {
            country: country.into(),
            indicator: indicator.into()
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn indicator(&self) -> &str {
        &self.indicator
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.country, self.indicator)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no series for '{0}'")]
    NotFound(SeriesKey),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),

    #[error(transparent)]
    CsvParseError(#[from] csv::Error),

    #[error("unexpected payload: {0}")]
    Format(String),

    #[error(transparent)]
    Series(#[from] FitError)
}

/// Supplier of historical series.
pub trait SeriesSource: Send + Sync {
    fn fetch(&self, key: &SeriesKey) -> Result<Series, SourceError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// InMemorySeriesSource
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct InMemorySeriesSource {
    map: HashMap<SeriesKey, Series>
}

impl InMemorySeriesSource {
    pub fn new() -> InMemorySeriesSource {
        InMemorySeriesSource::default()
    }

    pub fn insert(&mut self, key: SeriesKey, series: Series) -> Option<Series> {
        self.map.insert(key, series)
    }
}

impl SeriesSource for InMemorySeriesSource {
    fn fetch(&self, key: &SeriesKey) -> Result<Series, SourceError> {
        self.map
            .get(key)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(key.clone()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SyntheticSeriesSource
// ─────────────────────────────────────────────────────────────────────────────
//
// value(year) = level + slope·t + amplitude·sin(2π·t / period),  t = year - start
//
// level, slope, amplitude and period are derived from an FNV-1a hash of the
// key, so the same key always produces the same series.

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticSeriesSource {
    start_year: i32,
    end_year: i32
}

impl SyntheticSeriesSource {
    pub fn new(start_year: i32, end_year: i32) -> SyntheticSeriesSource {
        SyntheticSeriesSource { start_year, end_year }
    }

    fn seed(key: &SeriesKey) -> u64 {
        key.country
            .bytes()
            .chain(std::iter::once(b'/'))
            .chain(key.indicator.bytes())
            .fold(FNV_OFFSET, |hash, byte| (hash ^ byte as u64).wrapping_mul(FNV_PRIME))
    }

    /// Uniform value in `[0, 1)` taken from 16 bits of the seed.
    fn unit(seed: u64, shift: u32) -> f64 {
        ((seed >> shift) & 0xffff) as f64 / 65536.0
    }
}

impl Default for SyntheticSeriesSource {
    fn default() -> Self {
        SyntheticSeriesSource::new(1960, 2023)
    }
}

impl SeriesSource for SyntheticSeriesSource {
    fn fetch(&self, key: &SeriesKey) -> Result<Series, SourceError> {
        let seed = Self::seed(key);
        let level = 10.0 + 90.0 * Self::unit(seed, 0);
        let slope = 0.05 + 0.95 * Self::unit(seed, 16);
        let amplitude = 0.5 + 4.5 * Self::unit(seed, 32);
        let period = 6.0 + 10.0 * Self::unit(seed, 48);

        let observations = (self.start_year..=self.end_year)
            .map(|year| {
                let t = (year - self.start_year) as f64;
                let value = level + slope * t + amplitude * (2.0 * PI * t / period).sin();
                Observation::new(year, value)
            })
            .collect();

        debug!(%key, start = self.start_year, end = self.end_year, "generated synthetic series");
        Ok(Series::new(observations)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FallbackSeriesSource
// ─────────────────────────────────────────────────────────────────────────────

/// Tries `primary` first and degrades to `fallback` when it fails or returns
/// nothing.
pub struct FallbackSeriesSource<P, F> {
    primary: P,
    fallback: F
}

impl<P, F> FallbackSeriesSource<P, F>
where
    P: SeriesSource,
    F: SeriesSource {
    pub fn new(primary: P, fallback: F) -> FallbackSeriesSource<P, F> {
        FallbackSeriesSource { primary, fallback }
    }
}

impl<P, F> SeriesSource for FallbackSeriesSource<P, F>
where
    P: SeriesSource,
    F: SeriesSource {
    fn fetch(&self, key: &SeriesKey) -> Result<Series, SourceError> {
        match self.primary.fetch(key) {
            Ok(series) if !series.is_empty() => Ok(series),
            Ok(_) => {
                warn!(%key, "primary source returned an empty series, using fallback");
                self.fallback.fetch(key)
            },
            Err(error) => {
                warn!(%key, %error, "primary source failed, using fallback");
                self.fallback.fetch(key)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_is_deterministic() {
        let source = SyntheticSeriesSource::default();
        let key = SeriesKey::new("USA", "NY.GDP.PCAP.CD");
        let a = source.fetch(&key).unwrap();
        let b = source.fetch(&key).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(a.min_year(), Some(1960));
        assert_eq!(a.max_year(), Some(2023));
    }

    #[test]
    fn synthetic_differs_by_key() {
        let source = SyntheticSeriesSource::new(2000, 2010);
        let a = source.fetch(&SeriesKey::new("USA", "SP.POP.TOTL")).unwrap();
        let b = source.fetch(&SeriesKey::new("FRA", "SP.POP.TOTL")).unwrap();
        assert_ne!(a.values(), b.values());
    }

    #[test]
    fn fallback_on_missing_key() {
        let source = FallbackSeriesSource::new(InMemorySeriesSource::new(), SyntheticSeriesSource::new(2000, 2004));
        let series = source.fetch(&SeriesKey::new("DEU", "FP.CPI.TOTL.ZG")).unwrap();
        assert_eq!(series.len(), 5);
    }

    #[test]
    fn fallback_on_empty_series() {
        let key = SeriesKey::new("JPN", "SL.UEM.TOTL.ZS");
        let mut primary = InMemorySeriesSource::new();
        primary.insert(key.clone(), Series::empty());
        let source = FallbackSeriesSource::new(primary, SyntheticSeriesSource::new(2000, 2002));
        assert_eq!(source.fetch(&key).unwrap().len(), 3);
    }

    #[test]
    fn in_memory_reports_missing() {
        let source = InMemorySeriesSource::new();
        let err = source.fetch(&SeriesKey::new("USA", "X")).unwrap_err();
        assert_eq!(err.to_string(), "no series for 'USA/X'");
    }
}
