use crate::{Error, Result};
use ndarray::Array1;
use num_traits::Float;

/// Evenly spaced values within the half-open interval `[start, stop)`.
///
/// Follows `numpy.arange` for floating point arguments: the output has
/// `ceil((stop - start) / step)` elements (zero when that is negative) and
/// element `i` is `start + i * step`.
///
/// # Errors
/// * `step` is zero or not finite.
/// * The length cannot be computed because `(stop - start) / step` is NaN or
///   infinite.
/// * The length does not fit in `usize`.
///
/// # Examples
/// ```
/// use physoce_core::num_rs::arange;
///
/// let f = arange(0.25, 1.25, 0.25).unwrap();
/// assert_eq!(f.to_vec(), vec![0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn arange<T>(start: T, stop: T, step: T) -> Result<Array1<T>>
where
    T: Float,
{
    if step.is_zero() || !step.is_finite() {
        return Err(Error::InvalidArg {
            arg: "step".into(),
            reason: "step must be finite and non-zero".into(),
        });
    }
    let span = (stop - start) / step;
    if !span.is_finite() {
        return Err(Error::InvalidArg {
            arg: "stop".into(),
            reason: "cannot compute length of range".into(),
        });
    }
    let len = if span > T::zero() {
        span.ceil().to_usize().ok_or_else(|| Error::InvalidArg {
            arg: "stop".into(),
            reason: "range length exceeds usize".into(),
        })?
    } else {
        0
    };

    let mut out = Vec::with_capacity(len);
    let mut idx = T::zero();
    for _ in 0..len {
        out.push(start + idx * step);
        idx = idx + T::one();
    }
    Ok(Array1::from(out))
}
