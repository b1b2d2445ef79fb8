//! Country-keyed indicator tables.
//!
//! An [`IndicatorTable`] holds one row per country and one `f64` column per indicator,
//! stored row-major in an [`ndarray::Array2`]. Missing cells are `NaN`.

use anyhow::{Result, anyhow};
use ndarray::{Array2, ArrayView1};
use std::collections::{HashMap, HashSet};

pub mod io;

/// Name of the key column shared by every input table.
pub const COUNTRY_COLUMN: &str = "COUNTRY";

/// Suffixes appended to non-key columns present on both sides of a join.
pub const JOIN_SUFFIXES: (&str, &str) = ("_x", "_y");

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    countries: Vec<String>,
    columns: Vec<String>,
    values: Array2<f64>,
    /// Columns present in the source whose cells are not numbers. They are never analyzed.
    text_columns: Vec<String>,
}

impl IndicatorTable {
    /// Build a table, checking that country keys and column names are unique and that
    /// `values` is `countries.len() x columns.len()`.
    pub fn new(countries: Vec<String>, columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if values.dim() != (countries.len(), columns.len()) {
            return Err(anyhow!(
                "Value matrix has shape {:?}, expected ({}, {})",
                values.dim(),
                countries.len(),
                columns.len()
            ));
        }

        let mut seen = HashSet::with_capacity(countries.len());
        for country in &countries {
            if !seen.insert(country.as_str()) {
                return Err(anyhow!("Duplicate {} key: {}", COUNTRY_COLUMN, country));
            }
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column == COUNTRY_COLUMN {
                return Err(anyhow!("{} is the key and cannot be a value column", COUNTRY_COLUMN));
            }
            if !seen.insert(column.as_str()) {
                return Err(anyhow!("Duplicate column name: {}", column));
            }
        }

        Ok(IndicatorTable {
            countries,
            columns,
            values,
            text_columns: Vec::new(),
        })
    }

    /// Record columns that were read but could not be stored as numbers.
    pub fn with_text_columns(mut self, text_columns: Vec<String>) -> Self {
        self.text_columns = text_columns;
        self
    }

    /// Build a table from `(country, row values)` pairs.
    pub fn from_rows<S>(columns: &[S], rows: Vec<(String, Vec<f64>)>) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let width = columns.len();
        let mut countries = Vec::with_capacity(rows.len());
        let mut flat = Vec::with_capacity(rows.len() * width);

        for (country, row) in rows {
            if row.len() != width {
                return Err(anyhow!(
                    "Row for {} has {} values, expected {}",
                    country,
                    row.len(),
                    width
                ));
            }
            countries.push(country);
            flat.extend(row);
        }

        let values = Array2::from_shape_vec((countries.len(), width), flat)?;
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        IndicatorTable::new(countries, columns, values)
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn nrows(&self) -> usize {
        self.countries.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn text_columns(&self) -> &[String] {
        &self.text_columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of `name` among the value columns.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        if let Some(idx) = self.columns.iter().position(|c| c == name) {
            return Ok(idx);
        }
        if self.text_columns.iter().any(|c| c == name) {
            return Err(anyhow!("Column {} is not numeric", name));
        }
        Err(anyhow!(
            "Column {} not found; available columns: {}",
            name,
            self.columns.join(", ")
        ))
    }

    /// View over one indicator column, in row order.
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let idx = self.column_index(name)?;
        Ok(self.values.column(idx))
    }

    /// Value of `column` for `country`, if the country is present.
    pub fn value(&self, country: &str, column: &str) -> Result<Option<f64>> {
        let col = self.column_index(column)?;
        Ok(self
            .countries
            .iter()
            .position(|c| c == country)
            .map(|row| self.values[[row, col]]))
    }

    /// Inner join with `other` on `key`.
    ///
    /// Rows are the countries present in both tables, in `self`'s order. Columns are this
    /// table's columns followed by `other`'s; names present on both sides get the
    /// [`JOIN_SUFFIXES`].
    pub fn inner_join(&self, other: &IndicatorTable, key: &str) -> Result<IndicatorTable> {
        if key != COUNTRY_COLUMN {
            return Err(anyhow!(
                "Cannot join on {}: tables are keyed by {}",
                key,
                COUNTRY_COLUMN
            ));
        }

        let other_rows: HashMap<&str, usize> = other
            .countries
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let left_names: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        let right_names: HashSet<&str> = other.columns.iter().map(String::as_str).collect();

        let (left_suffix, right_suffix) = JOIN_SUFFIXES;
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if right_names.contains(c.as_str()) {
                    format!("{c}{left_suffix}")
                } else {
                    c.clone()
                }
            })
            .chain(other.columns.iter().map(|c| {
                if left_names.contains(c.as_str()) {
                    format!("{c}{right_suffix}")
                } else {
                    c.clone()
                }
            }))
            .collect();

        let mut countries = Vec::new();
        let mut flat = Vec::with_capacity(self.nrows() * columns.len());
        for (left_row, country) in self.countries.iter().enumerate() {
            if let Some(&right_row) = other_rows.get(country.as_str()) {
                countries.push(country.clone());
                flat.extend(self.values.row(left_row).iter().copied());
                flat.extend(other.values.row(right_row).iter().copied());
            }
        }

        let values = Array2::from_shape_vec((countries.len(), columns.len()), flat)?;

        let mut text_columns = self.text_columns.clone();
        for column in &other.text_columns {
            if !text_columns.contains(column) {
                text_columns.push(column.clone());
            }
        }

        Ok(IndicatorTable::new(countries, columns, values)?.with_text_columns(text_columns))
    }
}
