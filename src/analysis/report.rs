use crate::analysis::DependenceStatistics;
use std::fmt;

/// Readable label for an indicator column: `HEALTH_CARE_INDEX` -> `health care index`.
pub fn format_column_name(column_name: &str) -> String {
    column_name.replace('_', " ").to_lowercase()
}

/// Plain-text summary of one comparison, for diagnostic output.
#[derive(Debug, Clone)]
pub struct DependenceReport<'a> {
    comparer_column: &'a str,
    comparable_column: &'a str,
    stats: &'a DependenceStatistics,
}

impl<'a> DependenceReport<'a> {
    pub fn new(
        comparer_column: &'a str,
        comparable_column: &'a str,
        stats: &'a DependenceStatistics,
    ) -> Self {
        DependenceReport {
            comparer_column,
            comparable_column,
            stats,
        }
    }
}

impl fmt::Display for DependenceReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let comparer = format_column_name(self.comparer_column);
        let comparable = format_column_name(self.comparable_column);
        let s = self.stats;
        let diff = (s.median_comparable_high - s.median_comparable_low).abs();

        writeln!(f)?;
        writeln!(f, "Average {comparer}: {},", s.median_comparer)?;
        writeln!(
            f,
            "Average {comparable} for countries with above-average {comparer}: {}.",
            s.median_comparable_high
        )?;
        writeln!(
            f,
            "Average {comparable} for countries with below-average {comparer}: {}.",
            s.median_comparable_low
        )?;
        writeln!(f, "Difference: {diff}")?;
        writeln!(
            f,
            "Percent from average {comparable} value: {:.2}%",
            diff / s.median_comparable * 100.0
        )?;
        writeln!(f, "Correlation: {:.2}", s.correlation)?;
        writeln!(
            f,
            "P-value for difference in {comparable}: {:.4}",
            s.p_value
        )
    }
}
