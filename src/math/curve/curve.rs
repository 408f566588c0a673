/// A real function of one variable that can be evaluated and differentiated.
///
/// Fitted regression models implement this so that callers can treat a
/// trend line the same way regardless of how it was produced.
pub trait Curve {
    fn value(&self, x: f64) -> f64;

    fn derivative(&self, x: f64) -> f64;

    fn values(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.value(x)).collect()
    }
}
