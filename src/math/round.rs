/// Round `x` to `digits` decimal places, resolving exact ties to the even
/// neighbour.
pub fn round(x: f64, digits: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }

    let pow1: f64;
    let pow2: f64;

    if digits > 22 {
        // pow1 * pow2 would overflow as a single power of ten
        pow1 = 10.0_f64.powi((digits - 22) as i32);
        pow2 = 1e22;
    } else {
        pow1 = 10.0_f64.powi(digits as i32);
        pow2 = 1.0;
    }

    let y = (x * pow1) * pow2;
    let mut z = y.round();

    if (y - z).abs() == 0.5 {
        z = 2.0 * (y / 2.0).round();
    }

    (z / pow2) / pow1
}

/// Format `x` with a fixed number of decimals after half-even rounding.
pub fn format_fixed(x: f64, digits: u32) -> String {
    format!("{:.*}", digits as usize, round(x, digits))
}
