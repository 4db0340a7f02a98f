//! Special functions needed by the window provider.

/// Modified Bessel functions of the first kind.
pub trait Bessel {
    /// Zeroth-order modified Bessel function `I0(x)`.
    fn i0(self) -> Self;
}

// Power series sum_k ((x/2)^(2k) / (k!)^2); every term is positive so the
// partial sums converge monotonically for any finite x.
fn i0_f64(x: f64) -> f64 {
    if !x.is_finite() {
        return x.abs();
    }
    let q = 0.25 * x * x;
    let mut term = 1.0f64;
    let mut sum = 1.0f64;
    let mut k = 1.0f64;
    while term > f64::EPSILON * sum && k < 1000.0 {
        term *= q / (k * k);
        sum += term;
        k += 1.0;
    }
    sum
}

impl Bessel for f64 {
    fn i0(self) -> Self {
        i0_f64(self)
    }
}

impl Bessel for f32 {
    fn i0(self) -> Self {
        i0_f64(self as f64) as f32
    }
}
