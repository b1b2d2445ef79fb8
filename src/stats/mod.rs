//! Numeric kernels used by the dependence analysis.
//!
//! Everything in here works on plain slices and treats `NaN` as a missing value, the
//! same way the indicator tables store empty CSV cells.

use single_utilities::traits::FloatOps;

pub mod descriptive;
pub mod inference;

pub use descriptive::{median, pearson_correlation, round_to};

/// Number of decimal places every reported statistic is rounded to.
pub const STAT_DECIMALS: u32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TTestType {
    #[default]
    Student, // Equal variance
    Welch,   // Unequal variance
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestResult<T> {
    /// The t-statistic
    pub statistic: T,
    /// Two-tailed p-value of the test
    pub p_value: T,
    /// Degrees of freedom used for the Student-t distribution
    pub degrees_of_freedom: Option<T>,
}

impl<T> TestResult<T>
where
    T: FloatOps,
{
    /// Create a new test result with minimal information
    pub fn new(statistic: T, p_value: T) -> Self {
        TestResult {
            statistic,
            p_value,
            degrees_of_freedom: None,
        }
    }

    /// Result of a test that could not be run (e.g. a group with fewer than two values)
    pub fn undefined() -> Self {
        let nan = <T as num_traits::Float>::nan();
        TestResult::new(nan, nan)
    }

    /// Add degrees of freedom to the result
    pub fn with_degrees_of_freedom(mut self, df: T) -> Self {
        self.degrees_of_freedom = Some(df);
        self
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: T) -> bool {
        self.p_value < alpha
    }
}
