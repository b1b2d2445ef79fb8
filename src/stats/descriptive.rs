use single_utilities::traits::FloatOps;
use std::cmp::Ordering;

/// Round `value` to `decimals` places, ties to even.
///
/// Matches how tabular tooling rounds reported statistics (`rint(x * 10^d) / 10^d`), so a
/// value like `0.0125` becomes `0.012` rather than `0.013`. `NaN` and infinities pass
/// through unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// Median of the non-missing values in `values`.
///
/// `NaN` entries are skipped. Returns `NaN` when no value is left.
pub fn median<T>(values: &[T]) -> T
where
    T: FloatOps,
{
    let mut present: Vec<T> = values
        .iter()
        .copied()
        .filter(|v| !num_traits::Float::is_nan(*v))
        .collect();

    if present.is_empty() {
        return <T as num_traits::Float>::nan();
    }

    present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = present.len() / 2;
    if present.len() % 2 == 1 {
        present[mid]
    } else {
        (present[mid - 1] + present[mid]) / (T::one() + T::one())
    }
}

/// Pearson correlation coefficient between `x` and `y`.
///
/// Pairs where either side is missing are dropped before anything is computed. Fewer than
/// two complete pairs, or a column without variance, yields `NaN`.
pub fn pearson_correlation<T>(x: &[T], y: &[T]) -> T
where
    T: FloatOps,
{
    let pairs: Vec<(T, T)> = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| !num_traits::Float::is_nan(**a) && !num_traits::Float::is_nan(**b))
        .map(|(&a, &b)| (a, b))
        .collect();

    if pairs.len() < 2 {
        return <T as num_traits::Float>::nan();
    }

    let n = T::from(pairs.len()).unwrap_or_else(<T as num_traits::Float>::nan);
    let mut sum_x = T::zero();
    let mut sum_y = T::zero();
    for &(a, b) in &pairs {
        sum_x += a;
        sum_y += b;
    }
    let mean_x = sum_x / n;
    let mean_y = sum_y / n;

    let mut cov = T::zero();
    let mut ssq_x = T::zero();
    let mut ssq_y = T::zero();
    for &(a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        ssq_x += dx * dx;
        ssq_y += dy * dy;
    }

    let divisor = num_traits::Float::sqrt(ssq_x * ssq_y);
    if divisor == T::zero() {
        return <T as num_traits::Float>::nan();
    }

    // Floating point error can push a perfect fit just past 1.
    num_traits::Float::max(
        num_traits::Float::min(cov / divisor, T::one()),
        -T::one(),
    )
}
