use ndarray::{s, Array1, ArrayView1};
use num_traits::Float;

/// First discrete difference, `out[i] = a[i + 1] - a[i]`.
///
/// Inputs shorter than two elements produce an empty array, as
/// `numpy.diff` does.
pub fn diff<T>(a: ArrayView1<T>) -> Array1<T>
where
    T: Float,
{
    if a.len() < 2 {
        return Array1::from(Vec::new());
    }
    &a.slice(s![1..]) - &a.slice(s![..-1])
}

/// Arithmetic mean. An empty input yields NaN, matching `numpy.mean`.
pub fn mean<T>(a: ArrayView1<T>) -> T
where
    T: Float,
{
    if a.is_empty() {
        return T::nan();
    }
    let n = T::from(a.len()).unwrap_or_else(T::nan);
    a.iter().fold(T::zero(), |acc, &v| acc + v) / n
}

/// Mean spacing between consecutive samples, `mean(diff(a))`.
///
/// NaN for fewer than two samples.
pub fn mean_step<T>(a: ArrayView1<T>) -> T
where
    T: Float,
{
    mean(diff(a).view())
}
