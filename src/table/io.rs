use crate::table::{COUNTRY_COLUMN, IndicatorTable};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use ndarray::Array2;
use std::{fs::File, io::Read, path::Path};
use tracing::debug;

impl IndicatorTable {
    /// Load an indicator table from a CSV file with a `COUNTRY` column.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let table = Self::from_reader(file).with_context(|| format!("reading {}", path.display()))?;
        debug!(
            path = %path.display(),
            rows = table.nrows(),
            columns = table.ncols(),
            "loaded indicator table"
        );
        Ok(table)
    }

    /// Parse CSV data whose header contains `COUNTRY` plus indicator columns.
    ///
    /// Empty cells and the usual missing-value markers ([`MISSING_TOKENS`]) become `NaN`.
    /// A column holding any other non-numeric cell is kept out of the value matrix and
    /// listed in [`IndicatorTable::text_columns`]; asking for it later is an error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = reader.headers()?.clone();
        let key_idx = headers
            .iter()
            .position(|h| h == COUNTRY_COLUMN)
            .ok_or_else(|| anyhow!("Missing {} column in header", COUNTRY_COLUMN))?;

        let mut countries = Vec::new();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (i, cell) in record.iter().enumerate() {
                if i == key_idx {
                    countries.push(cell.to_string());
                } else {
                    cells[i].push(cell.to_string());
                }
            }
        }

        let mut columns = Vec::new();
        let mut parsed: Vec<Vec<f64>> = Vec::new();
        let mut text_columns = Vec::new();
        for (i, header) in headers.iter().enumerate() {
            if i == key_idx {
                continue;
            }
            match parse_column(&cells[i]) {
                Ok(values) => {
                    columns.push(header.to_string());
                    parsed.push(values);
                }
                Err(err) => {
                    debug!(column = header, reason = %err, "skipping non-numeric column");
                    text_columns.push(header.to_string());
                }
            }
        }

        let values = Array2::from_shape_fn((countries.len(), columns.len()), |(row, col)| {
            parsed[col][row]
        });
        Ok(IndicatorTable::new(countries, columns, values)?.with_text_columns(text_columns))
    }
}

/// Cell contents read as a missing value, in addition to the empty cell.
pub const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn parse_column(cells: &[String]) -> Result<Vec<f64>> {
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| parse_cell(cell).with_context(|| format!("data row {}", row + 1)))
        .collect()
}

fn parse_cell(cell: &str) -> Result<f64> {
    if cell.is_empty() || MISSING_TOKENS.contains(&cell) {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| anyhow!("Invalid numeric value: {:?}", cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_key_anywhere_in_header() {
        let data = "RANK,COUNTRY,CRIME_INDEX\n1,Venezuela,83.8\n2,Austria,25.0\n";
        let table = IndicatorTable::from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.columns(), &["RANK".to_string(), "CRIME_INDEX".to_string()]);
        assert_eq!(table.countries(), &["Venezuela".to_string(), "Austria".to_string()]);
        assert_eq!(table.value("Venezuela", "CRIME_INDEX").unwrap(), Some(83.8));
    }

    #[test]
    fn test_empty_cells_are_missing() {
        let data = "COUNTRY,GDP\nAustria,\nBrazil, 9000 \n";
        let table = IndicatorTable::from_reader(data.as_bytes()).unwrap();

        assert!(table.value("Austria", "GDP").unwrap().unwrap().is_nan());
        assert_eq!(table.value("Brazil", "GDP").unwrap(), Some(9000.0));
    }

    #[test]
    fn test_missing_key_column() {
        let data = "NAME,GDP\nAustria,1\n";
        let err = IndicatorTable::from_reader(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Missing COUNTRY column"));
    }

    #[test]
    fn test_missing_value_markers_are_nan() {
        let mut data = String::from("COUNTRY,GDP\n");
        for (i, token) in MISSING_TOKENS.iter().enumerate() {
            data.push_str(&format!("C{},{}\n", i, token));
        }
        data.push_str("Austria,53000\n");

        let table = IndicatorTable::from_reader(data.as_bytes()).unwrap();
        assert!(table.text_columns().is_empty());
        for i in 0..MISSING_TOKENS.len() {
            let value = table.value(&format!("C{}", i), "GDP").unwrap().unwrap();
            assert!(value.is_nan(), "{:?} should be missing", MISSING_TOKENS[i]);
        }
        assert_eq!(table.value("Austria", "GDP").unwrap(), Some(53000.0));
    }

    #[test]
    fn test_text_column_is_skipped() {
        let data = "COUNTRY,REGION,GDP\nAustria,Europe,53000\nBrazil,Americas,NA\n";
        let table = IndicatorTable::from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.columns(), &["GDP".to_string()]);
        assert_eq!(table.text_columns(), &["REGION".to_string()]);
        assert!(table.value("Brazil", "GDP").unwrap().unwrap().is_nan());
        let err = table.column("REGION").unwrap_err();
        assert_eq!(err.to_string(), "Column REGION is not numeric");
    }

    #[test]
    fn test_dash_is_not_a_missing_marker() {
        let data = "COUNTRY,GDP\nAustria,-\n";
        let table = IndicatorTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.text_columns(), &["GDP".to_string()]);
        assert!(parse_cell("-").is_err());
    }

    #[test]
    fn test_ragged_record_is_an_error() {
        let data = "COUNTRY,GDP\nAustria,1,2\n";
        assert!(IndicatorTable::from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = IndicatorTable::from_csv_path("/nonexistent/gdp_per_capita.csv").unwrap_err();
        assert!(err.to_string().contains("opening /nonexistent/gdp_per_capita.csv"));
    }
}
