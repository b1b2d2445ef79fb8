//! Two-sample t-tests.
//!
//! Student's test (pooled variance) is the default used by the dependence analysis; Welch's
//! test is available for callers that do not want to assume equal variances.

use crate::stats::{TTestType, TestResult};
use single_utilities::traits::FloatOps;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Perform a t-test comparing two independent samples.
///
/// Missing values must already be removed by the caller. Samples with fewer than two values
/// make the test undefined, and the result carries `NaN` for both statistic and p-value.
///
/// # Arguments
///
/// * `x` - First sample
/// * `y` - Second sample
/// * `test_type` - Type of t-test to perform
///
/// # Returns
///
/// `TestResult` containing the t-statistic, the two-tailed p-value and the degrees of freedom.
pub fn t_test<T>(x: &[T], y: &[T], test_type: TTestType) -> TestResult<f64>
where
    T: FloatOps,
{
    if x.len() < 2 || y.len() < 2 {
        return TestResult::undefined();
    }

    let (n1, mean1, var1) = sample_moments(x);
    let (n2, mean2, var2) = sample_moments(y);

    t_test_from_moments(n1, mean1, var1, n2, mean2, var2, test_type)
}

/// Perform a t-test from per-group sample size, mean and unbiased variance.
pub fn t_test_from_moments(
    n1: f64,
    mean1: f64,
    var1: f64,
    n2: f64,
    mean2: f64,
    var2: f64,
    test_type: TTestType,
) -> TestResult<f64> {
    if n1 < 2.0 || n2 < 2.0 {
        return TestResult::undefined();
    }

    let mean_diff = mean1 - mean2;

    let (t_stat, df) = match test_type {
        TTestType::Student => {
            let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0);
            let std_err = (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
            (mean_diff / std_err, n1 + n2 - 2.0)
        }
        TTestType::Welch => {
            let term1 = var1 / n1;
            let term2 = var2 / n2;
            let combined_var = term1 + term2;
            let t = mean_diff / combined_var.sqrt();

            // Welch-Satterthwaite equation for degrees of freedom
            let df = combined_var * combined_var
                / (term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0));
            (t, df)
        }
    };

    TestResult::new(t_stat, two_tailed_p_value(t_stat, df)).with_degrees_of_freedom(df)
}

/// Two-tailed p-value of `t_stat` under a Student-t distribution with `df` degrees of freedom.
///
/// A zero standard error gives an infinite statistic (p = 0) when the means differ and an
/// undefined one (p = NaN) when they do not.
fn two_tailed_p_value(t_stat: f64, df: f64) -> f64 {
    // Separated samples without spread; Welch's df is 0/0 here.
    if t_stat.is_infinite() {
        return 0.0;
    }
    if t_stat.is_nan() || df.is_nan() {
        return f64::NAN;
    }

    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => (2.0 * t_dist.sf(t_stat.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

/// Sample size, mean and unbiased variance of `values`, computed in two passes.
fn sample_moments<T>(values: &[T]) -> (f64, f64, f64)
where
    T: FloatOps,
{
    let n = values.len() as f64;

    let mut sum = 0.0;
    for &val in values {
        sum += val.to_f64().unwrap_or(f64::NAN);
    }
    let mean = sum / n;

    let mut sum_sq_dev = 0.0;
    for &val in values {
        let dev = val.to_f64().unwrap_or(f64::NAN) - mean;
        sum_sq_dev += dev * dev;
    }

    (n, mean, sum_sq_dev / (n - 1.0))
}
