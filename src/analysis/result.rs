use crate::analysis::DependenceStatistics;
use anyhow::{Context, Result, anyhow};
use csv::WriterBuilder;
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};
use tracing::info;

/// Output columns, in file order (after the leading row-key column).
pub const RESULT_COLUMNS: [&str; 8] = [
    "COMPARER_COLUMN",
    "AVERAGE_COMPARER",
    "AVERAGE_COMPARABLE_HIGHER",
    "AVERAGE_COMPARABLE_LOWER",
    "DIFFERENCE",
    "DIFFERENCE_PERCENT",
    "CORRELATION",
    "P_VALUE",
];

/// One row of the result table, keyed by `comparer_column`.
#[derive(Debug, Clone, PartialEq)]
pub struct DependenceRow {
    pub comparer_column: String,
    pub average_comparer: f64,
    pub average_comparable_higher: f64,
    pub average_comparable_lower: f64,
    pub difference: f64,
    pub difference_percent: f64,
    pub correlation: f64,
    pub p_value: f64,
}

impl DependenceRow {
    /// Derive a row from computed statistics.
    ///
    /// `difference_percent` is relative to the comparable column's overall median, so a zero
    /// median is rejected instead of producing an infinite percentage.
    pub fn from_statistics(comparer_column: &str, stats: &DependenceStatistics) -> Result<Self> {
        let difference = (stats.median_comparable_high - stats.median_comparable_low).abs();

        if stats.median_comparable == 0.0 {
            return Err(anyhow!(
                "Division by zero computing difference percent for {}: comparable median is 0",
                comparer_column
            ));
        }
        let difference_percent = difference / stats.median_comparable * 100.0;

        Ok(DependenceRow {
            comparer_column: comparer_column.to_string(),
            average_comparer: stats.median_comparer,
            average_comparable_higher: stats.median_comparable_high,
            average_comparable_lower: stats.median_comparable_low,
            difference,
            difference_percent,
            correlation: stats.correlation,
            p_value: stats.p_value,
        })
    }
}

/// On-disk shape of a row. `NaN` becomes `None` so it is written as an empty cell.
#[derive(Serialize)]
struct RowRecord<'a> {
    #[serde(rename = "")]
    key: &'a str,
    #[serde(rename = "COMPARER_COLUMN")]
    comparer_column: &'a str,
    #[serde(rename = "AVERAGE_COMPARER")]
    average_comparer: Option<f64>,
    #[serde(rename = "AVERAGE_COMPARABLE_HIGHER")]
    average_comparable_higher: Option<f64>,
    #[serde(rename = "AVERAGE_COMPARABLE_LOWER")]
    average_comparable_lower: Option<f64>,
    #[serde(rename = "DIFFERENCE")]
    difference: Option<f64>,
    #[serde(rename = "DIFFERENCE_PERCENT")]
    difference_percent: Option<f64>,
    #[serde(rename = "CORRELATION")]
    correlation: Option<f64>,
    #[serde(rename = "P_VALUE")]
    p_value: Option<f64>,
}

fn present(value: f64) -> Option<f64> {
    if value.is_nan() { None } else { Some(value) }
}

impl<'a> From<&'a DependenceRow> for RowRecord<'a> {
    fn from(row: &'a DependenceRow) -> Self {
        RowRecord {
            key: &row.comparer_column,
            comparer_column: &row.comparer_column,
            average_comparer: present(row.average_comparer),
            average_comparable_higher: present(row.average_comparable_higher),
            average_comparable_lower: present(row.average_comparable_lower),
            difference: present(row.difference),
            difference_percent: present(row.difference_percent),
            correlation: present(row.correlation),
            p_value: present(row.p_value),
        }
    }
}

/// Accumulator of dependence rows, one per comparer column, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<DependenceRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[DependenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, comparer_column: &str) -> Option<&DependenceRow> {
        self.rows.iter().find(|r| r.comparer_column == comparer_column)
    }

    /// Insert `row`, replacing an existing row with the same key in place.
    pub fn upsert(&mut self, row: DependenceRow) {
        match self
            .rows
            .iter_mut()
            .find(|r| r.comparer_column == row.comparer_column)
        {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    /// Derive a row from `stats` and upsert it under `comparer_column`.
    pub fn save_statistics(
        &mut self,
        comparer_column: &str,
        stats: &DependenceStatistics,
    ) -> Result<()> {
        let row = DependenceRow::from_statistics(comparer_column, stats)?;
        self.upsert(row);
        Ok(())
    }

    /// Write the table as CSV with a leading row-key column.
    pub fn write_csv_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);

        if self.rows.is_empty() {
            let mut header = vec![""];
            header.extend(RESULT_COLUMNS);
            writer.write_record(&header)?;
        }
        for row in &self.rows {
            writer.serialize(RowRecord::from(row))?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        self.write_csv_to(file)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows = self.rows.len(), "wrote dependency table");
        Ok(())
    }
}
