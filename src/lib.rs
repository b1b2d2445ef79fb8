//! # country-dependence
//!
//! Descriptive statistics and significance measures between pairs of country-level
//! socioeconomic indicators: GDP, crime index, murder rate and quality-of-life sub-indices.
//!
//! For each pair, countries are split at the median of a *comparer* indicator and the median
//! of a *comparable* indicator is compared between the two halves. The comparison is backed by
//! a Pearson correlation over the whole table and a two-sample t-test between the halves.
//!
//! ## Module Organization
//!
//! - **[`stats`]**: Median, correlation, rounding and t-tests
//! - **[`table`]**: Country-keyed indicator tables, CSV loading and inner joins
//! - **[`analysis`]**: The dependence analyzer and the result table it fills
//! - **[`app`]**: The batch driver that reads inputs, runs every job and writes the outputs
//! - **[`config`]**: Environment-driven configuration for the driver

pub mod analysis;
pub mod app;
pub mod config;
pub mod stats;
pub mod table;
