//! Median-split dependence analysis between two indicator columns.
//!
//! For a *comparer* column and a *comparable* column, the analyzer splits countries at the
//! comparer's median, compares the comparable column's median in the two halves, and backs the
//! comparison with a Pearson correlation and a two-sample t-test. Every statistic is rounded to
//! [`STAT_DECIMALS`] places; the input values themselves are never rounded.

use crate::stats::inference::t_test;
use crate::stats::{STAT_DECIMALS, TTestType, median, pearson_correlation, round_to};
use crate::table::IndicatorTable;
use anyhow::Result;
use tracing::{debug, info};

pub mod report;
pub mod result;

pub use report::DependenceReport;
pub use result::{DependenceRow, RESULT_COLUMNS, ResultTable};

pub const GDP_COLUMN: &str = "GDP";
pub const CRIME_INDEX_COLUMN: &str = "CRIME_INDEX";
pub const MURDER_RATE_COLUMN: &str = "RATE_PER_100000_N";

/// Quality-of-life indicators every target metric is compared against.
pub const COMPARER_COLUMNS: [&str; 7] = [
    "QUALITY_OF_LIFE_INDEX",
    "PURCHASING_POWER_INDEX",
    "HEALTH_CARE_INDEX",
    "COST_OF_LIVING_INDEX",
    "PROPERTY_PRICE_TO_INCOME_RATIO",
    "POLLUTION_INDEX",
    "CLIMATE_INDEX",
];

/// Statistics describing how a comparable column depends on a comparer column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DependenceStatistics {
    /// Median of the comparer column over the whole table
    pub median_comparer: f64,
    /// Median of the comparable column over the whole table
    pub median_comparable: f64,
    /// Median of the comparable column where the comparer is above its median (`NaN` if none)
    pub median_comparable_high: f64,
    /// Median of the comparable column where the comparer is at or below its median
    pub median_comparable_low: f64,
    /// Pearson correlation between the two columns over complete pairs
    pub correlation: f64,
    /// Two-tailed p-value of the high/low t-test on the comparable column
    pub p_value: f64,
}

/// Row groups produced by splitting a table at the comparer median.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedianSplit {
    /// Comparable values of rows whose comparer is strictly above the median
    pub high: Vec<f64>,
    /// Comparable values of rows whose comparer is at or below the median
    pub low: Vec<f64>,
}

impl MedianSplit {
    /// Partition rows by `comparer > threshold`. Ties go to `low`; rows whose comparer is
    /// missing end up in neither group.
    pub fn partition(comparer: &[f64], comparable: &[f64], threshold: f64) -> Self {
        let mut split = MedianSplit::default();
        for (&c, &v) in comparer.iter().zip(comparable.iter()) {
            if c > threshold {
                split.high.push(v);
            } else if c <= threshold {
                split.low.push(v);
            }
        }
        split
    }
}

#[derive(Debug, Clone, Default)]
pub struct DependenceAnalyzer {
    test_type: TTestType,
    verbose: bool,
}

impl DependenceAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different t-test flavour for the high/low comparison.
    pub fn with_test_type(mut self, test_type: TTestType) -> Self {
        self.test_type = test_type;
        self
    }

    /// Log a human-readable summary of every comparison at `info` level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn test_type(&self) -> TTestType {
        self.test_type
    }

    /// Compute the dependence statistics of `comparable_column` on `comparer_column`.
    ///
    /// Fails only when either column is missing from `table`.
    pub fn calculate_dependence_statistics(
        &self,
        table: &IndicatorTable,
        comparer_column: &str,
        comparable_column: &str,
    ) -> Result<DependenceStatistics> {
        let comparer = table.column(comparer_column)?.to_vec();
        let comparable = table.column(comparable_column)?.to_vec();

        let median_comparer = round_to(median(&comparer), STAT_DECIMALS);
        let median_comparable = round_to(median(&comparable), STAT_DECIMALS);

        let split = MedianSplit::partition(&comparer, &comparable, median_comparer);

        let median_comparable_high = round_to(median(&split.high), STAT_DECIMALS);
        let median_comparable_low = round_to(median(&split.low), STAT_DECIMALS);

        let correlation = round_to(pearson_correlation(&comparer, &comparable), STAT_DECIMALS);

        let high: Vec<f64> = split.high.iter().copied().filter(|v| !v.is_nan()).collect();
        let low: Vec<f64> = split.low.iter().copied().filter(|v| !v.is_nan()).collect();
        let test = t_test(&high, &low, self.test_type);
        let p_value = round_to(test.p_value, STAT_DECIMALS);

        debug!(
            comparer = comparer_column,
            comparable = comparable_column,
            rows = table.nrows(),
            high = high.len(),
            low = low.len(),
            t = test.statistic,
            "computed dependence statistics"
        );

        Ok(DependenceStatistics {
            median_comparer,
            median_comparable,
            median_comparable_high,
            median_comparable_low,
            correlation,
            p_value,
        })
    }

    /// Compute the statistics for one column pair and upsert them into `results`.
    pub fn calculate_dependence_by_column(
        &self,
        table: &IndicatorTable,
        results: &mut ResultTable,
        comparer_column: &str,
        comparable_column: &str,
    ) -> Result<()> {
        let stats =
            self.calculate_dependence_statistics(table, comparer_column, comparable_column)?;

        results.save_statistics(comparer_column, &stats)?;

        if self.verbose {
            info!(
                "{}",
                DependenceReport::new(comparer_column, comparable_column, &stats)
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn linear_table() -> IndicatorTable {
        IndicatorTable::from_rows(
            &["COMPARER", "COMPARABLE"],
            vec![
                ("A".to_string(), vec![1.0, 10.0]),
                ("B".to_string(), vec![2.0, 20.0]),
                ("C".to_string(), vec![3.0, 30.0]),
                ("D".to_string(), vec![4.0, 40.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_four_country_scenario() {
        let stats = DependenceAnalyzer::new()
            .calculate_dependence_statistics(&linear_table(), "COMPARER", "COMPARABLE")
            .unwrap();

        assert_eq!(stats.median_comparer, 2.5);
        assert_eq!(stats.median_comparable, 25.0);
        assert_eq!(stats.median_comparable_high, 35.0);
        assert_eq!(stats.median_comparable_low, 15.0);
        assert_eq!(stats.correlation, 1.0);
        assert_abs_diff_eq!(stats.p_value, 0.106, epsilon = 1e-12);
    }

    #[test]
    fn test_partition_ties_go_low_and_missing_go_nowhere() {
        let comparer = [1.0, 2.0, 2.0, 3.0, f64::NAN];
        let comparable = [10.0, 20.0, 21.0, 30.0, 99.0];
        let split = MedianSplit::partition(&comparer, &comparable, 2.0);

        assert_eq!(split.high, vec![30.0]);
        assert_eq!(split.low, vec![10.0, 20.0, 21.0]);
    }

    #[test]
    fn test_constant_comparer_leaves_high_empty() {
        let table = IndicatorTable::from_rows(
            &["COMPARER", "COMPARABLE"],
            vec![
                ("A".to_string(), vec![5.0, 1.0]),
                ("B".to_string(), vec![5.0, 2.0]),
                ("C".to_string(), vec![5.0, 3.0]),
            ],
        )
        .unwrap();

        let stats = DependenceAnalyzer::new()
            .calculate_dependence_statistics(&table, "COMPARER", "COMPARABLE")
            .unwrap();

        assert_eq!(stats.median_comparer, 5.0);
        assert!(stats.median_comparable_high.is_nan());
        assert_eq!(stats.median_comparable_low, 2.0);
        assert!(stats.correlation.is_nan());
        assert!(stats.p_value.is_nan());
    }

    #[test]
    fn test_missing_comparable_values_are_dropped_from_groups() {
        let table = IndicatorTable::from_rows(
            &["COMPARER", "COMPARABLE"],
            vec![
                ("A".to_string(), vec![1.0, 10.0]),
                ("B".to_string(), vec![2.0, f64::NAN]),
                ("C".to_string(), vec![3.0, 12.0]),
                ("D".to_string(), vec![4.0, 30.0]),
                ("E".to_string(), vec![5.0, 40.0]),
                ("F".to_string(), vec![6.0, f64::NAN]),
            ],
        )
        .unwrap();

        let stats = DependenceAnalyzer::new()
            .calculate_dependence_statistics(&table, "COMPARER", "COMPARABLE")
            .unwrap();

        assert_eq!(stats.median_comparer, 3.5);
        assert_eq!(stats.median_comparable, 21.0);
        assert_eq!(stats.median_comparable_high, 35.0);
        assert_eq!(stats.median_comparable_low, 11.0);
        assert!(!stats.p_value.is_nan());
    }

    #[test]
    fn test_statistics_are_rounded_to_three_places() {
        let table = IndicatorTable::from_rows(
            &["COMPARER", "COMPARABLE"],
            vec![
                ("A".to_string(), vec![1.00011, 1.23456]),
                ("B".to_string(), vec![2.00022, 2.34567]),
                ("C".to_string(), vec![3.00033, 1.11111]),
            ],
        )
        .unwrap();

        let stats = DependenceAnalyzer::new()
            .calculate_dependence_statistics(&table, "COMPARER", "COMPARABLE")
            .unwrap();

        assert_eq!(stats.median_comparer, 2.0);
        assert_eq!(stats.median_comparable, 1.235);
        // B's raw comparer (2.00022) is above the rounded median, so it lands in `high`.
        assert_eq!(stats.median_comparable_high, 1.728);
        assert_eq!(stats.median_comparable_low, 1.235);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = DependenceAnalyzer::new()
            .calculate_dependence_statistics(&linear_table(), "GDP", "COMPARABLE")
            .unwrap_err();
        assert!(err.to_string().contains("Column GDP not found"));
    }

    #[test]
    fn test_welch_analyzer_reports_same_medians() {
        let student = DependenceAnalyzer::new()
            .calculate_dependence_statistics(&linear_table(), "COMPARER", "COMPARABLE")
            .unwrap();
        let welch = DependenceAnalyzer::new()
            .with_test_type(TTestType::Welch)
            .calculate_dependence_statistics(&linear_table(), "COMPARER", "COMPARABLE")
            .unwrap();

        assert_eq!(student.median_comparable_high, welch.median_comparable_high);
        // Equal group sizes and variances make both tests agree.
        assert_eq!(student.p_value, welch.p_value);
    }

    #[test]
    fn test_verbose_analyzer_still_upserts() {
        let analyzer = DependenceAnalyzer::new().with_verbose(true);
        let mut results = ResultTable::new();

        analyzer
            .calculate_dependence_by_column(&linear_table(), &mut results, "COMPARER", "COMPARABLE")
            .unwrap();
        analyzer
            .calculate_dependence_by_column(&linear_table(), &mut results, "COMPARER", "COMPARABLE")
            .unwrap();

        assert_eq!(results.len(), 1);
        let row = results.get("COMPARER").unwrap();
        assert_eq!(row.average_comparer, 2.5);
        assert_eq!(row.difference, 20.0);
        assert_eq!(row.difference_percent, 80.0);
    }
}
