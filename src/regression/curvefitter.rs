use nalgebra::{
    DMatrix,
    DVector
};
use tracing::debug;

use crate::estimation::diagnostics::ModelDiagnostics;
use crate::regression::fiterror::FitError;
use crate::regression::polynomialmodel::PolynomialModel;
use crate::series::series::Series;

/// Ordinary least-squares polynomial fitter of a fixed degree.
///
/// # Numerical notes
/// Years are mapped onto `t = (year - centre) / half_span`, which keeps the
/// design matrix within `[-1, 1]`. The system is solved through the SVD of
/// the design matrix; a rank below `degree + 1` is reported as
/// `FitError::NumericalFit` instead of returning unstable coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveFitter {
    degree: usize
}

impl CurveFitter {
    pub fn new(degree: usize) -> Result<CurveFitter, FitError> {
        if degree == 0 {
            return Err(FitError::InvalidDegree(degree));
        }
        Ok(CurveFitter { degree })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn min_points(&self) -> usize {
        self.degree + 1
    }

    pub fn fit(&self, series: &Series) -> Result<PolynomialModel, FitError> {
        let n = series.len();
        if n < self.min_points() {
            return Err(FitError::insufficient_data(self.degree, n));
        }

        let years = series.years();
        let (centre, scale) = Self::basis_transform(&years);
        let k = self.degree + 1;

        let design = DMatrix::from_fn(n, k, |i, j| ((years[i] - centre) / scale).powi(j as i32));
        let target = DVector::from_vec(series.values());

        let svd = design.svd(true, true);
        let max_singular = svd.singular_values.max();
        let tolerance = f64::EPSILON * n.max(k) as f64 * max_singular;
        let rank = svd.rank(tolerance);
        if rank < k {
            return Err(FitError::NumericalFit(format!(
                "design matrix is rank deficient (rank {} < {})", rank, k
            )));
        }

        let solution = svd
            .solve(&target, tolerance)
            .map_err(|error| FitError::NumericalFit(error.to_string()))?;

        if solution.iter().any(|a| !a.is_finite()) {
            return Err(FitError::NumericalFit("non-finite coefficient in solution".to_owned()));
        }

        let model = PolynomialModel::from_scaled(centre, scale, solution.iter().copied().collect());
        debug!(
            degree = self.degree,
            points = n,
            equation = %model.equation(),
            "fitted polynomial"
        );
        Ok(model)
    }

    pub fn fit_with_diagnostics(&self, series: &Series) -> Result<(PolynomialModel, ModelDiagnostics), FitError> {
        let model = self.fit(series)?;
        let diagnostics = ModelDiagnostics::evaluate(&model, series)?;
        Ok((model, diagnostics))
    }

    fn basis_transform(years: &[f64]) -> (f64, f64) {
        let min = years.iter().copied().fold(f64::INFINITY, f64::min);
        let max = years.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let half_span = (max - min) / 2.0;
        let scale = if half_span > 0.0 { half_span } else { 1.0 };
        ((min + max) / 2.0, scale)
    }
}

/// Fit a polynomial of `degree` to `series`.
pub fn fit(series: &Series, degree: usize) -> Result<PolynomialModel, FitError> {
    CurveFitter::new(degree)?.fit(series)
}
