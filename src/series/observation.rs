use serde::{
    Deserialize,
    Serialize
};

/// One `(year, value)` point of an indicator series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    year: i32,
    value: f64
}

impl Observation {
    pub fn new(year: i32, value: f64) -> Observation {
        Observation { year, value }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl From<(i32, f64)> for Observation {
    fn from((year, value): (i32, f64)) -> Self {
        Observation::new(year, value)
    }
}
