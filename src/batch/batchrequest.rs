use serde::{
    Deserialize,
    Serialize
};

use crate::regression::fiterror::FitError;

/// Inclusive window of years accepted for evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32
}

impl YearBounds {
    pub fn new(min: i32, max: i32) -> YearBounds {
        YearBounds { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

impl Default for YearBounds {
    fn default() -> Self {
        YearBounds { min: 1950, max: 2100 }
    }
}

/// Years to evaluate in one batch.
///
/// A range is `start..=end` walked by `step`. Explicit lists keep their order
/// and duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchRequest {
    Range {
        start: i32,
        end: i32,
        #[serde(default = "default_step")]
        step: i32
    },
    Years(Vec<i32>)
}

fn default_step() -> i32 {
    1
}

impl BatchRequest {
    pub fn range(start: i32, end: i32, step: i32) -> BatchRequest {
        BatchRequest::Range { start, end, step }
    }

    pub fn years_of(years: Vec<i32>) -> BatchRequest {
        BatchRequest::Years(years)
    }

    /// Expand into concrete years, dropping any outside `bounds`.
    ///
    /// Lenient: a range with `start >= end` or a non-positive step yields no
    /// years at all.
    pub fn years(&self, bounds: &YearBounds) -> Vec<i32> {
        match self {
            BatchRequest::Range { start, end, step } => {
                if start >= end || *step < 1 {
                    return Vec::new();
                }
                // walk only the part of the range inside bounds, keeping the
                // stride anchored at `start`
                let (start, step) = (*start as i64, *step as i64);
                let lower = start.max(bounds.min as i64);
                let upper = (*end as i64).min(bounds.max as i64);
                let first = start + (lower - start + step - 1) / step * step;
                if first > upper {
                    return Vec::new();
                }
                (first..=upper)
                    .step_by(step as usize)
                    .map(|year| year as i32)
                    .collect()
            },
            BatchRequest::Years(years) => {
                years.iter()
                    .copied()
                    .filter(|year| bounds.contains(*year))
                    .collect()
            }
        }
    }

    /// Strict counterpart of the lenient policy in [`BatchRequest::years`].
    pub fn validate_strict(&self) -> Result<(), FitError> {
        match self {
            BatchRequest::Range { start, end, step } if start >= end || *step < 1 => {
                Err(FitError::InvalidRange { start: *start, end: *end, step: *step })
            },
            _ => Ok(())
        }
    }
}
