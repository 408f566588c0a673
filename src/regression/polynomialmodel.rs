use serde::{
    de,
    Deserialize,
    Serialize
};

use crate::math::curve::curve::Curve;
use crate::math::round::{
    format_fixed,
    round
};

// ─────────────────────────────────────────────────────────────────────────────
// PolynomialModel
// ─────────────────────────────────────────────────────────────────────────────
//
// Public contract (raw year powers):
//
//   p(x) = intercept + Σ_{i=1..d} coefficients[i-1]·x^i
//
// Internal representation (centred, scaled):
//
//   p(x) = Σ_{k=0..d} a_k·t^k,   t = (x - centre) / scale
//
// Evaluation always goes through the centred form; raw powers of calendar
// years (2000^5 ≈ 3.2e16) would otherwise swamp the significant digits.

const EQUATION_DIGITS: u32 = 4;

/// Magnitudes outside `[EQUATION_MIN_FIXED, EQUATION_MAX_FIXED)` are written
/// in scientific notation.
const EQUATION_MIN_FIXED: f64 = 1e-4;
const EQUATION_MAX_FIXED: f64 = 1e6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolynomialModel {
    degree: usize,
    /// Raw-year power coefficients `[c_1, ..., c_d]`.
    coefficients: Vec<f64>,
    intercept: f64,
    centre: f64,
    scale: f64,
    /// Centred-basis coefficients `[a_0, ..., a_d]`.
    scaled_coefficients: Vec<f64>
}

impl PolynomialModel {
    /// Build a model directly from raw-year power coefficients.
    ///
    /// `coefficients[i]` multiplies `x^(i+1)`.
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> PolynomialModel {
        let mut scaled_coefficients = Vec::with_capacity(coefficients.len() + 1);
        scaled_coefficients.push(intercept);
        scaled_coefficients.extend_from_slice(&coefficients);
        PolynomialModel {
            degree: coefficients.len(),
            coefficients,
            intercept,
            centre: 0.0,
            scale: 1.0,
            scaled_coefficients
        }
    }

    /// Build a model from coefficients of the centred basis
    /// `t = (x - centre) / scale`, expanding them into raw-year powers.
    pub(crate) fn from_scaled(centre: f64, scale: f64, scaled_coefficients: Vec<f64>) -> PolynomialModel {
        let raw = Self::expand_to_raw(centre, scale, &scaled_coefficients);
        let intercept = raw[0];
        let coefficients = raw[1..].to_vec();
        PolynomialModel {
            degree: scaled_coefficients.len() - 1,
            coefficients,
            intercept,
            centre,
            scale,
            scaled_coefficients
        }
    }

    /// Σ_k a_k·((x - c)/s)^k  =  Σ_j x^j · Σ_{k≥j} a_k·s^(-k)·C(k, j)·(-c)^(k-j)
    fn expand_to_raw(centre: f64, scale: f64, scaled: &[f64]) -> Vec<f64> {
        let n = scaled.len();
        let mut raw = vec![0.0; n];

        for (k, &a_k) in scaled.iter().enumerate() {
            let lead = a_k / scale.powi(k as i32);
            let mut binomial = 1.0;
            for j in 0..=k {
                raw[j] += lead * binomial * (-centre).powi((k - j) as i32);
                // C(k, j+1) = C(k, j)·(k - j)/(j + 1)
                binomial = binomial * (k - j) as f64 / (j + 1) as f64;
            }
        }

        raw
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Evaluate the model at every year, preserving order.
    pub fn predict(&self, years: &[f64]) -> Vec<f64> {
        self.values(years)
    }

    fn to_basis(&self, x: f64) -> f64 {
        (x - self.centre) / self.scale
    }

    /// Human-readable form, e.g. `y = 12.0000 + 0.5000*x - 0.0100*x^2`.
    ///
    /// Every term is written out; negative coefficients render as a
    /// subtraction instead of `+ -`. Very large or very small magnitudes use
    /// scientific notation (`1.4500e18*x`).
    pub fn equation(&self) -> String {
        let (negative, magnitude) = Self::format_coefficient(self.intercept);
        let mut equation = format!("y = {}{}", if negative { "-" } else { "" }, magnitude);

        for (i, &coef) in self.coefficients.iter().enumerate() {
            let power = i + 1;
            let (negative, magnitude) = Self::format_coefficient(coef);
            let sign = if negative { "-" } else { "+" };
            let term = if power == 1 {
                format!("{}*x", magnitude)
            } else {
                format!("{}*x^{}", magnitude, power)
            };
            equation.push_str(&format!(" {} {}", sign, term));
        }

        equation
    }

    /// Sign and unsigned text of one coefficient. The sign is taken from
    /// the value as displayed, so anything that rounds to zero is positive.
    fn format_coefficient(coef: f64) -> (bool, String) {
        let magnitude = coef.abs();
        if magnitude != 0.0 && !(EQUATION_MIN_FIXED..EQUATION_MAX_FIXED).contains(&magnitude) {
            return (coef < 0.0, format!("{:.*e}", EQUATION_DIGITS as usize, magnitude));
        }
        let rounded = round(coef, EQUATION_DIGITS);
        (rounded < 0.0, format_fixed(rounded.abs(), EQUATION_DIGITS))
    }
}

impl<'de> Deserialize<'de> for PolynomialModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de> {
        #[derive(Deserialize)]
        struct PolynomialModelJsonProp {
            degree: usize,
            coefficients: Vec<f64>,
            centre: f64,
            scale: f64,
            scaled_coefficients: Vec<f64>
        }

        let prop = PolynomialModelJsonProp::deserialize(deserializer)?;
        if prop.scaled_coefficients.is_empty() {
            return Err(de::Error::custom("scaled_coefficients must not be empty"));
        }
        if prop.scaled_coefficients.len() != prop.degree + 1 || prop.coefficients.len() != prop.degree {
            return Err(de::Error::custom(format!(
                "degree {} does not match {} raw and {} scaled coefficients",
                prop.degree,
                prop.coefficients.len(),
                prop.scaled_coefficients.len()
            )));
        }
        if !prop.centre.is_finite() || !prop.scale.is_finite() || prop.scale <= 0.0 {
            return Err(de::Error::custom(format!(
                "invalid basis transform: centre {}, scale {}", prop.centre, prop.scale
            )));
        }
        if prop.scaled_coefficients.iter().any(|a| !a.is_finite()) {
            return Err(de::Error::custom("scaled_coefficients must be finite"));
        }

        // raw coefficients are always re-derived from the centred form
        Ok(PolynomialModel::from_scaled(prop.centre, prop.scale, prop.scaled_coefficients))
    }
}

impl Curve for PolynomialModel {
    fn value(&self, x: f64) -> f64 {
        let t = self.to_basis(x);
        self.scaled_coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &a| acc * t + a)
    }

    fn derivative(&self, x: f64) -> f64 {
        let t = self.to_basis(x);
        let dt = self.scaled_coefficients
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(0.0, |acc, (k, &a)| acc * t + k as f64 * a);
        dt / self.scale
    }
}
